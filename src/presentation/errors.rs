// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::dto::book_request::ApiResponse;
use crate::domain::services::search_service::SearchServiceError;
use crate::infrastructure::storage::cover::CoverError;

/// 应用错误类型
///
/// 把领域错误映射为状态码与带标记的 JSON 失败响应
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::failure(None, self.message));
        (self.status, body).into_response()
    }
}

impl From<SearchServiceError> for AppError {
    fn from(err: SearchServiceError) -> Self {
        match err {
            SearchServiceError::Validation(details) => Self::new(StatusCode::BAD_REQUEST, details),
            SearchServiceError::Search { message, .. }
            | SearchServiceError::Detail { message, .. } => {
                Self::new(StatusCode::BAD_GATEWAY, message)
            }
            SearchServiceError::Cancelled(reason) => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, reason)
            }
        }
    }
}

impl From<CoverError> for AppError {
    fn from(err: CoverError) -> Self {
        let status = match &err {
            CoverError::Validation(_) => StatusCode::BAD_REQUEST,
            CoverError::Fetch(_) => StatusCode::BAD_GATEWAY,
            CoverError::Image(_) | CoverError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}
