// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search_result::{DetailMeta, SearchResult};
use crate::infrastructure::catalog::labels::{self, MetaField};
use crate::utils::text_processing::{collapse_whitespace, normalize_label, parse_word_count};
use crate::utils::url_utils::{absolutize, proxy_image_url};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

/// `标签：` 标记
///
/// 第 1 组是已知标签，字间允许空白（`作&nbsp;&nbsp;者：`）；第 2 组是任意不含空白的标签，最长 8 个字符
static LABEL_MARK: Lazy<Regex> = Lazy::new(|| {
    let mut known: Vec<&str> = labels::FIELD_SYNONYMS
        .iter()
        .flat_map(|(_, synonyms)| synonyms.iter().copied())
        .collect();
    known.sort_by_key(|syn| std::cmp::Reverse(syn.chars().count()));
    let known: Vec<String> = known.into_iter().map(spaced_synonym).collect();

    Regex::new(&format!(
        r"(?:({})|([^\s:：|｜/／]{{1,8}}))\s*[:：]",
        known.join("|")
    ))
    .expect("valid label regex")
});

/// 详情页每个字段一条正则，由同义词表生成
static DETAIL_PATTERNS: Lazy<Vec<(MetaField, Regex)>> = Lazy::new(|| {
    labels::DETAIL_FIELDS
        .iter()
        .filter_map(|field| {
            let alternatives: Vec<String> = labels::synonyms(*field)
                .iter()
                .copied()
                .map(spaced_synonym)
                .collect();
            let pattern = format!(
                r"(?:{})\s*[:：]\s*([^\s|｜/／,，;；:：]+)",
                alternatives.join("|")
            );
            match Regex::new(&pattern) {
                Ok(re) => Some((*field, re)),
                Err(e) => {
                    warn!("Invalid detail pattern for {:?}: {}", field, e);
                    None
                }
            }
        })
        .collect()
});

/// `作者` → `作\s*者`
fn spaced_synonym(synonym: &str) -> String {
    synonym
        .chars()
        .map(|c| regex::escape(&c.to_string()))
        .collect::<Vec<_>>()
        .join(r"\s*")
}

struct CompiledSelectors {
    rows: Vec<Selector>,
    title_links: Vec<Selector>,
    title_texts: Vec<Selector>,
    descriptions: Vec<Selector>,
    meta_items: Vec<Selector>,
    detail: Vec<Selector>,
    image: Selector,
    link: Selector,
    dt: Selector,
    body: Selector,
}

static SELECTORS: Lazy<CompiledSelectors> = Lazy::new(|| CompiledSelectors {
    rows: compile(labels::ROW_SELECTORS),
    title_links: compile(labels::TITLE_LINK_SELECTORS),
    title_texts: compile(labels::TITLE_TEXT_SELECTORS),
    descriptions: compile(labels::DESCRIPTION_SELECTORS),
    meta_items: compile(labels::META_ITEM_SELECTORS),
    detail: compile(labels::DETAIL_SELECTORS),
    image: Selector::parse("img").expect("valid img selector"),
    link: Selector::parse("a[href]").expect("valid link selector"),
    dt: Selector::parse("dt").expect("valid dt selector"),
    body: Selector::parse("body").expect("valid body selector"),
});

fn compile(list: &[&str]) -> Vec<Selector> {
    list.iter()
        .filter_map(|s| match Selector::parse(s) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!("Skipping invalid selector '{}': {:?}", s, e);
                None
            }
        })
        .collect()
}

/// 目录页面字段提取器
///
/// 搜索页按行提取，每行独立处理；详情页先走结构化选择器，再对全文做正则兜底。
#[derive(Debug, Clone)]
pub struct CatalogExtractor {
    base_url: Url,
    image_proxy: String,
    max_results: usize,
}

impl CatalogExtractor {
    pub fn new(base_url: Url, image_proxy: impl Into<String>, max_results: usize) -> Self {
        Self {
            base_url,
            image_proxy: image_proxy.into(),
            max_results,
        }
    }

    /// 解析搜索结果页，按文档顺序返回，最多 `max_results` 条
    pub fn extract_search_results(&self, html: &str) -> Vec<SearchResult> {
        let document = Html::parse_document(html);

        let rows = SELECTORS
            .rows
            .iter()
            .map(|selector| document.select(selector).collect::<Vec<_>>())
            .find(|rows| !rows.is_empty())
            .unwrap_or_default();

        debug!("Found {} candidate rows", rows.len());

        rows.into_iter()
            .filter_map(|row| self.extract_row(row))
            .take(self.max_results)
            .collect()
    }

    /// 解析详情页中的分类与平台
    pub fn extract_detail(&self, html: &str) -> DetailMeta {
        let document = Html::parse_document(html);
        let mut meta = DetailMeta::default();

        'selectors: for selector in &SELECTORS.detail {
            for element in document.select(selector) {
                fill_detail(&mut meta, &spaced_text(element));
                if meta.is_complete() {
                    break 'selectors;
                }
            }
        }

        if !meta.is_complete() {
            debug!("Structured pass incomplete ({:?}), scanning document text", meta);
            fill_detail(&mut meta, &visible_text(&document));
        }

        if meta.category.is_none() && meta.platform.is_none() {
            warn!("No detail metadata matched");
        }

        meta
    }

    fn extract_row(&self, row: ElementRef<'_>) -> Option<SearchResult> {
        let (title, link) = self.title_and_link(row);
        if title.is_empty() {
            debug!("Skipping row without title");
            return None;
        }

        let mut result = SearchResult::new(title);
        result.source_url = absolutize(&self.base_url, &link);
        result.cover_url = self.cover_url(row);
        result.description = SELECTORS
            .descriptions
            .iter()
            .find_map(|selector| row.select(selector).next())
            .map(inline_text)
            .unwrap_or_default();

        apply_metadata(row, &mut result);
        Some(result)
    }

    fn title_and_link(&self, row: ElementRef<'_>) -> (String, String) {
        for selector in &SELECTORS.title_links {
            for anchor in row.select(selector) {
                let title = inline_text(anchor);
                if !title.is_empty() {
                    let href = anchor.value().attr("href").unwrap_or_default();
                    return (title, href.to_string());
                }
            }
        }

        let title = SELECTORS
            .title_texts
            .iter()
            .filter_map(|selector| row.select(selector).next())
            .map(inline_text)
            .find(|t| !t.is_empty())
            .unwrap_or_default();

        let href = row
            .select(&SELECTORS.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default()
            .to_string();

        (title, href)
    }

    fn cover_url(&self, row: ElementRef<'_>) -> String {
        let raw = row
            .select(&SELECTORS.image)
            .find_map(|img| {
                labels::COVER_ATTRIBUTES
                    .iter()
                    .filter_map(|attr| img.value().attr(attr))
                    .map(str::trim)
                    .find(|v| !v.is_empty() && !v.starts_with("data:"))
            })
            .unwrap_or_default();

        let absolute = absolutize(&self.base_url, raw);
        proxy_image_url(&self.image_proxy, &absolute)
    }
}

/// 收集行内的标签/值对并写入结果，每个字段只写一次
fn apply_metadata(row: ElementRef<'_>, result: &mut SearchResult) {
    let mut pairs: Vec<(String, String)> = Vec::new();

    for dt in row.select(&SELECTORS.dt) {
        if let Some(dd) = dt
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .next()
            .filter(|el| el.value().name() == "dd")
        {
            pairs.push((inline_text(dt), inline_text(dd)));
        }
    }

    for selector in &SELECTORS.meta_items {
        for item in row.select(selector) {
            pairs.extend(label_value_pairs(&spaced_text(item)));
        }
    }

    pairs.extend(label_value_pairs(&spaced_text(row)));

    let mut filled = HashSet::new();
    for (label, value) in pairs {
        let Some(field) = labels::match_label(&normalize_label(&label)) else {
            continue;
        };
        if value.is_empty() || filled.contains(&field) {
            continue;
        }

        match field {
            MetaField::Author => result.author = value,
            MetaField::Category => result.category = value,
            MetaField::Platform => result.platform = Some(value),
            MetaField::WordCount => {
                let count = parse_word_count(&value);
                if count == 0 {
                    continue;
                }
                result.word_count = count;
            }
        }
        filled.insert(field);
    }

    if !filled.contains(&MetaField::Author) {
        debug!("No author label for '{}'", result.title);
    }
}

/// 将 `作者：刘慈欣 分类：科幻` 拆成有序的标签/值对
///
/// 未分隔的 `刘慈欣分类：` 会按已知标签后缀切开
pub fn label_value_pairs(text: &str) -> Vec<(String, String)> {
    let mut marks: Vec<(usize, usize, String)> = Vec::new();

    for caps in LABEL_MARK.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if let Some(known) = caps.get(1) {
            marks.push((known.start(), whole.end(), normalize_label(known.as_str())));
            continue;
        }
        let Some(label) = caps.get(2) else {
            continue;
        };
        let raw = label.as_str();
        let normalized = normalize_label(raw);

        let (start, name) = if labels::match_label(&normalized).is_some() {
            (label.start(), normalized)
        } else if let Some(suffix) = known_label_suffix(raw) {
            (label.end() - suffix.len(), suffix.to_string())
        } else {
            (label.start(), normalized)
        };

        marks.push((start, whole.end(), name));
    }

    marks
        .iter()
        .enumerate()
        .map(|(i, (_, value_start, name))| {
            let value_end = marks
                .get(i + 1)
                .map(|(next_start, _, _)| *next_start)
                .unwrap_or(text.len())
                .max(*value_start);
            (name.clone(), clean_value(&text[*value_start..value_end]))
        })
        .collect()
}

fn known_label_suffix(raw: &str) -> Option<&'static str> {
    labels::FIELD_SYNONYMS
        .iter()
        .flat_map(|(_, synonyms)| synonyms.iter())
        .filter(|syn| raw.ends_with(**syn) && raw.len() > syn.len())
        .max_by_key(|syn| syn.len())
        .copied()
}

fn clean_value(raw: &str) -> String {
    collapse_whitespace(raw.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '|' | '｜' | '/' | '／' | ',' | '，' | ';' | '；')
    }))
}

fn fill_detail(meta: &mut DetailMeta, text: &str) {
    for (field, pattern) in DETAIL_PATTERNS.iter() {
        let slot = match field {
            MetaField::Category => &mut meta.category,
            MetaField::Platform => &mut meta.platform,
            _ => continue,
        };
        if slot.is_some() {
            continue;
        }
        if let Some(value) = pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|v| !v.is_empty())
        {
            *slot = Some(value);
        }
    }
}

/// 元素文本，直接拼接
fn inline_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// 元素文本，文本节点之间以空格分隔
fn spaced_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// 文档可见文本，跳过 script/style
fn visible_text(document: &Html) -> String {
    let Some(body) = document.select(&SELECTORS.body).next() else {
        return String::new();
    };

    body.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent().and_then(|p| p.value().as_element().map(|e| e.name()));
            match parent {
                Some("script") | Some("style") | Some("noscript") => None,
                _ => Some(text.trim().to_string()),
            }
        })
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
