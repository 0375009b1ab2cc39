// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchQueryDto {
    #[serde(default)]
    pub keyword: String,
    /// 为 true 时用详情页补全分类与平台
    #[serde(default)]
    pub enrich: bool,
}

#[derive(Debug, Deserialize)]
pub struct DetailQueryDto {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct DetailsRequestDto {
    pub urls: Vec<String>,
    /// 缺省时使用配置中的默认并发数
    pub concurrency: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CoverRequestDto {
    pub url: String,
    pub title: Option<String>,
}

/// 统一的带标记响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(data: Option<T>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            error: Some(error.into()),
        }
    }
}
