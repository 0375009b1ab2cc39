// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 目录站点的启发式配置数据
//!
//! 标签同义词与选择器都是有序列表，扩展时只改这里，不动提取流程。

/// 可从元数据块中识别的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaField {
    Author,
    Category,
    Platform,
    WordCount,
}

/// 字段 → 可接受的中文标签（已去空白、去冒号）
pub const FIELD_SYNONYMS: &[(MetaField, &[&str])] = &[
    (MetaField::Author, &["作者"]),
    (MetaField::Category, &["类别", "分类", "类型", "题材"]),
    (MetaField::Platform, &["来源", "平台"]),
    (MetaField::WordCount, &["字数"]),
];

/// 详情页需要补全的字段
pub const DETAIL_FIELDS: &[MetaField] = &[MetaField::Category, MetaField::Platform];

/// 搜索结果行，第一个命中的选择器生效
pub const ROW_SELECTORS: &[&str] = &[
    "div.bookbox",
    "div.result-item",
    "li.result-item",
    "ul.result-list > li",
    "div.book-list > div.item",
    "table.grid tr",
];

/// 标题链接
pub const TITLE_LINK_SELECTORS: &[&str] = &[
    ".bookname a",
    ".book-title a",
    "h3 a",
    "h4 a",
    "a.title",
];

/// 没有链接时的标题文本
pub const TITLE_TEXT_SELECTORS: &[&str] = &[".bookname", ".book-title", "h3", "h4", ".title"];

/// 封面图片属性，懒加载属性优先
pub const COVER_ATTRIBUTES: &[&str] = &["data-original", "data-src", "src"];

pub const DESCRIPTION_SELECTORS: &[&str] =
    &[".intro", ".desc", ".description", ".summary", ".update"];

/// 行内可能承载 `标签：值` 的元素
pub const META_ITEM_SELECTORS: &[&str] = &[
    ".author",
    ".cat",
    ".meta span",
    ".info span",
    ".bookinfo span",
    ".bookinfo p",
    ".info p",
    "p",
    "span",
];

/// 详情页结构化候选元素，按优先级排列
pub const DETAIL_SELECTORS: &[&str] = &[
    "#info p",
    "div.bookinfo p",
    "div.book-info li",
    "ul.book-info li",
    "div.info li",
    "div.small span",
    ".book-meta span",
    "dl dd",
    "p",
    "li",
];

/// 将规范化后的标签映射到字段，未识别返回 `None`
pub fn match_label(normalized: &str) -> Option<MetaField> {
    FIELD_SYNONYMS
        .iter()
        .find(|(_, synonyms)| synonyms.contains(&normalized))
        .map(|(field, _)| *field)
}

pub fn synonyms(field: MetaField) -> &'static [&'static str] {
    FIELD_SYNONYMS
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, s)| *s)
        .unwrap_or(&[])
}
