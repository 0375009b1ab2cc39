// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::models::search_result::{DetailMeta, SearchResult};
use crate::domain::search::engine::{BookCatalog, CatalogError};
use crate::engines::retrieval_client::RetrievalClient;
use crate::infrastructure::catalog::extractor::CatalogExtractor;
use crate::utils::text_encoding::EncodingResolver;
use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

/// 搜索页路径模板
const SEARCH_PATH: &str = "/search/articlename/{keyword}/1.html";

/// 目录站点客户端
///
/// 获取 → 解码 → 提取 三段串联，每段各自负责自己的失败处理
pub struct CatalogClient {
    base_url: Url,
    retrieval: RetrievalClient,
    resolver: EncodingResolver,
    extractor: CatalogExtractor,
}

impl CatalogClient {
    pub fn new(
        base_url: Url,
        retrieval: RetrievalClient,
        resolver: EncodingResolver,
        extractor: CatalogExtractor,
    ) -> Self {
        Self {
            base_url,
            retrieval,
            resolver,
            extractor,
        }
    }

    /// 从配置构建客户端
    pub fn from_settings(
        settings: &Settings,
        retrieval: RetrievalClient,
    ) -> Result<Self, CatalogError> {
        let base_url = Url::parse(&settings.catalog.base_url).map_err(|e| {
            CatalogError::InvalidUrl(format!("{}: {}", settings.catalog.base_url, e))
        })?;
        let extractor = CatalogExtractor::new(
            base_url.clone(),
            settings.catalog.image_proxy.clone(),
            settings.catalog.max_results,
        );

        Ok(Self::new(
            base_url,
            retrieval,
            EncodingResolver::new(&settings.encoding),
            extractor,
        ))
    }

    /// 构建搜索URL，关键词做百分号编码
    pub fn search_url(&self, keyword: &str) -> Result<String, CatalogError> {
        let path = SEARCH_PATH.replace("{keyword}", &urlencoding::encode(keyword));
        self.base_url
            .join(&path)
            .map(|u| u.to_string())
            .map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn fetch_text(&self, url: &str) -> Result<String, CatalogError> {
        let response = self.retrieval.fetch(url).await?;
        Ok(self.resolver.decode(&response.body, response.content_type()))
    }
}

#[async_trait]
impl BookCatalog for CatalogClient {
    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, CatalogError> {
        let url = self.search_url(keyword)?;
        info!("Searching catalog for '{}'", keyword);

        let html = self.fetch_text(&url).await?;
        let results = self.extractor.extract_search_results(&html);

        debug!("Extracted {} results for '{}'", results.len(), keyword);
        Ok(results)
    }

    async fn fetch_detail(&self, source_url: &str) -> Result<DetailMeta, CatalogError> {
        let html = self.fetch_text(source_url).await?;
        Ok(self.extractor.extract_detail(&html))
    }
}
