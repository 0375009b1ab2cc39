// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 文本规整工具
//!
//! 目录页面的文本通常夹杂全角空白、换行和中英文冒号，这里集中处理：
//! - 空白折叠
//! - 标签规范化（去空白、去冒号）
//! - 字数解析（支持 `X万` 记法）

use once_cell::sync::Lazy;
use regex::Regex;

static WAN_NOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)万").expect("valid wan regex"));

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digit regex"));

/// 折叠连续空白（含全角空格与 `&nbsp;`）为单个空格并去除首尾空白
pub fn collapse_whitespace(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '\u{3000}' || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 规范化元数据标签：去掉所有空白和中英文冒号
pub fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ':' | '：' | '\u{3000}' | '\u{a0}'))
        .collect()
}

/// 解析字数
///
/// - `12.5万` → 125000（四舍五入）
/// - `1,234,567` → 1234567
/// - 其它文本取第一段连续数字，无数字时返回 0
pub fn parse_word_count(text: &str) -> u64 {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, ',' | '，') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return 0;
    }

    if let Some(caps) = WAN_NOTATION.captures(&cleaned) {
        if let Ok(value) = caps[1].parse::<f64>() {
            return (value * 10_000.0).round() as u64;
        }
    }

    DIGIT_RUN
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(0)
}
