// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{Extension, Json};
use std::sync::Arc;

use crate::{
    application::dto::book_request::{ApiResponse, CoverRequestDto},
    infrastructure::storage::cover::CoverDownloader,
    presentation::errors::AppError,
};

/// 下载封面并返回本地 `file://` URI
pub async fn download_cover(
    Extension(downloader): Extension<Arc<CoverDownloader>>,
    Json(payload): Json<CoverRequestDto>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    let uri = downloader
        .download_cover(&payload.url, payload.title.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(uri)))
}
