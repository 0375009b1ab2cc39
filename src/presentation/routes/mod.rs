// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::services::search_service::BookSearchService;
use crate::infrastructure::storage::cover::CoverDownloader;
use crate::presentation::handlers::{cover_handler, search_handler};
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由，服务实例通过 `Extension` 注入
pub fn routes(
    service: Arc<BookSearchService>,
    downloader: Arc<CoverDownloader>,
    settings: Arc<Settings>,
) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let book_routes = Router::new()
        .route("/v1/search", get(search_handler::search))
        .route("/v1/detail", get(search_handler::detail))
        .route("/v1/details", post(search_handler::details))
        .route("/v1/cover", post(cover_handler::download_cover))
        .layer(Extension(service))
        .layer(Extension(downloader))
        .layer(Extension(settings));

    Router::new()
        .merge(public_routes)
        .merge(book_routes)
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
