// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Json, Query},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::debug;

use crate::{
    application::dto::book_request::{
        ApiResponse, DetailQueryDto, DetailsRequestDto, SearchQueryDto,
    },
    config::settings::Settings,
    domain::{
        models::search_result::{DetailMeta, SearchResult},
        services::search_service::BookSearchService,
    },
    presentation::errors::AppError,
    queue::cancellation::CancellationToken,
};

/// 处理搜索请求
///
/// 失败时依然返回空的 `data` 列表，调用方无需区分缺失与空结果
pub async fn search(
    Extension(service): Extension<Arc<BookSearchService>>,
    Extension(settings): Extension<Arc<Settings>>,
    Query(query): Query<SearchQueryDto>,
) -> impl IntoResponse {
    match service.search(&query.keyword).await {
        Ok(results) => {
            let results = if query.enrich {
                let concurrency = settings.concurrency.clamp(None);
                service.enrich(results, concurrency, None).await
            } else {
                results
            };
            (StatusCode::OK, Json(ApiResponse::ok(results))).into_response()
        }
        Err(e) => {
            let AppError { status, message } = AppError::from(e);
            let body = ApiResponse::<Vec<SearchResult>>::failure(Some(Vec::new()), message);
            (status, Json(body)).into_response()
        }
    }
}

/// 处理单个详情页请求
pub async fn detail(
    Extension(service): Extension<Arc<BookSearchService>>,
    Query(query): Query<DetailQueryDto>,
) -> Result<Json<ApiResponse<DetailMeta>>, AppError> {
    let detail = service.fetch_detail(&query.url).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

/// 批量抓取详情页
///
/// 返回与 `urls` 按下标对齐的结果，单个失败不影响其它条目
pub async fn details(
    Extension(service): Extension<Arc<BookSearchService>>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<DetailsRequestDto>,
) -> Json<ApiResponse<Vec<ApiResponse<DetailMeta>>>> {
    let concurrency = settings.concurrency.clamp(payload.concurrency);
    let on_progress = |completed: usize, total: usize| {
        debug!("Detail batch progress {}/{}", completed, total);
    };

    let report = service
        .fetch_details(
            &payload.urls,
            concurrency,
            Some(&on_progress),
            CancellationToken::new(),
        )
        .await;

    let outcomes = report
        .into_iter()
        .map(|outcome| match outcome {
            Ok(detail) => ApiResponse::ok(detail),
            Err(e) => ApiResponse::failure(None, e.to_string()),
        })
        .collect();

    Json(ApiResponse::ok(outcomes))
}
