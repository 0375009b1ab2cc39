// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search_result::{DetailMeta, SearchResult};
use crate::engines::traits::EngineError;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(#[from] EngineError),
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

/// 书目目录站点
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// 按关键词搜索，关键词已去除首尾空白且非空
    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, CatalogError>;

    /// 抓取单个结果的详情页
    async fn fetch_detail(&self, source_url: &str) -> Result<DetailMeta, CatalogError>;
}
