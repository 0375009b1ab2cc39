// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 作者缺失时使用的占位值
pub const UNKNOWN_AUTHOR: &str = "未知作者";

/// 目录站点上的一条搜索结果
///
/// 所有字段在返回前都有确定值：缺失的数据用空串、0 或 [`UNKNOWN_AUTHOR`] 表示
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    pub author: String,
    pub cover_url: String,
    pub platform: Option<String>,
    pub category: String,
    pub word_count: u64,
    pub description: String,
    pub source_url: String,
}

impl Default for SearchResult {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: UNKNOWN_AUTHOR.to_string(),
            cover_url: String::new(),
            platform: None,
            category: String::new(),
            word_count: 0,
            description: String::new(),
            source_url: String::new(),
        }
    }
}

impl SearchResult {
    pub fn new(title: String) -> Self {
        Self {
            title,
            ..Self::default()
        }
    }

    /// 用详情页数据补全空缺的分类与平台，已有值不会被覆盖
    pub fn merge_detail(&mut self, detail: &DetailMeta) {
        if self.category.is_empty() {
            if let Some(category) = &detail.category {
                self.category = category.clone();
            }
        }
        if self.platform.is_none() {
            self.platform = detail.platform.clone();
        }
    }
}

/// 详情页补充的元数据
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetailMeta {
    pub category: Option<String>,
    pub platform: Option<String>,
}

impl DetailMeta {
    pub fn is_complete(&self) -> bool {
        self.category.is_some() && self.platform.is_some()
    }
}
