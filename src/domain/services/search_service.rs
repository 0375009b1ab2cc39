// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search_result::{DetailMeta, SearchResult};
use crate::domain::search::engine::{BookCatalog, CatalogError};
use crate::queue::cancellation::CancellationToken;
use crate::queue::executor::{ConcurrencyExecutor, ExecutionReport, ProgressFn};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone)]
pub enum SearchServiceError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Search failed: {message}")]
    Search {
        message: String,
        #[source]
        source: CatalogError,
    },
    #[error("Detail fetch failed: {message}")]
    Detail {
        message: String,
        #[source]
        source: CatalogError,
    },
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

impl SearchServiceError {
    fn search(source: CatalogError) -> Self {
        SearchServiceError::Search {
            message: source.to_string(),
            source,
        }
    }

    fn detail(source: CatalogError) -> Self {
        SearchServiceError::Detail {
            message: source.to_string(),
            source,
        }
    }

    fn cancelled(token: &CancellationToken) -> Self {
        SearchServiceError::Cancelled(token.reason().unwrap_or_else(|| "cancelled".to_string()))
    }
}

/// 书目搜索服务
///
/// 进程内只构建一次，通过 `Arc` 共享给各个调用方
#[derive(Clone)]
pub struct BookSearchService {
    catalog: Arc<dyn BookCatalog>,
}

impl BookSearchService {
    pub fn new(catalog: Arc<dyn BookCatalog>) -> Self {
        Self { catalog }
    }

    /// 按关键词搜索
    ///
    /// 空白关键词直接返回空列表，不发起网络请求
    pub async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, SearchServiceError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(Vec::new());
        }

        self.catalog.search(keyword).await.map_err(|e| {
            warn!("Search for '{}' failed: {}", keyword, e);
            SearchServiceError::search(e)
        })
    }

    /// 抓取单个详情页
    pub async fn fetch_detail(&self, source_url: &str) -> Result<DetailMeta, SearchServiceError> {
        let source_url = source_url.trim();
        if source_url.is_empty() {
            return Err(SearchServiceError::Validation(
                "source url cannot be empty".to_string(),
            ));
        }

        self.catalog.fetch_detail(source_url).await.map_err(|e| {
            warn!("Detail fetch for {} failed: {}", source_url, e);
            SearchServiceError::detail(e)
        })
    }

    /// 并发抓取多个详情页，结果与输入按下标对齐
    ///
    /// 令牌触发后未开始的条目不再请求目录，进行中的请求被放弃
    pub async fn fetch_details(
        &self,
        urls: &[String],
        concurrency: usize,
        on_progress: Option<ProgressFn<'_>>,
        cancel: CancellationToken,
    ) -> ExecutionReport<DetailMeta, SearchServiceError> {
        let tasks: Vec<_> = urls
            .iter()
            .map(|url| {
                let service = self.clone();
                let url = url.clone();
                move |token: CancellationToken| async move {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => Err(SearchServiceError::cancelled(&token)),
                        result = service.fetch_detail(&url) => result,
                    }
                }
            })
            .collect();

        ConcurrencyExecutor::new(concurrency)
            .with_cancellation(cancel)
            .run(tasks, on_progress)
            .await
    }

    /// 用详情页补全搜索结果中缺失的分类与平台
    ///
    /// 单条失败只记录日志，对应结果保持原样
    pub async fn enrich(
        &self,
        mut results: Vec<SearchResult>,
        concurrency: usize,
        on_progress: Option<ProgressFn<'_>>,
    ) -> Vec<SearchResult> {
        let pending: Vec<usize> = results
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                !r.source_url.is_empty() && (r.category.is_empty() || r.platform.is_none())
            })
            .map(|(i, _)| i)
            .collect();

        if pending.is_empty() {
            return results;
        }

        let urls: Vec<String> = pending
            .iter()
            .map(|&i| results[i].source_url.clone())
            .collect();
        let report = self
            .fetch_details(&urls, concurrency, on_progress, CancellationToken::new())
            .await;

        let mut enriched = 0;
        for (&index, outcome) in pending.iter().zip(report) {
            match outcome {
                Ok(detail) => {
                    results[index].merge_detail(&detail);
                    enriched += 1;
                }
                Err(e) => warn!("Could not enrich '{}': {}", results[index].title, e),
            }
        }

        info!("Enriched {}/{} results", enriched, pending.len());
        results
    }
}

#[cfg(test)]
#[path = "search_service_test.rs"]
mod tests;
