// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::EncodingSettings;
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, GBK, UTF_8};
use once_cell::sync::Lazy;
use regex::bytes::Regex as BytesRegex;
use regex::Regex;
use tracing::{debug, warn};

/// 从 Content-Type 头中提取 charset
static HEADER_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?\s*([A-Za-z0-9_\-]+)"#).expect("valid charset regex")
});

/// 匹配 `<meta charset="x">` 与 `<meta http-equiv=... content="...; charset=x">`
static META_CHARSET: Lazy<BytesRegex> = Lazy::new(|| {
    BytesRegex::new(r#"(?i)<meta[^>]*?charset\s*=\s*["']?\s*([A-Za-z0-9_\-]+)"#)
        .expect("valid meta charset regex")
});

/// 编码来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    /// 传输层 Content-Type 声明
    Header,
    /// 文档内 meta 声明
    Meta,
    /// 字节级探测
    Detected,
    /// 地区默认编码
    Fallback,
}

/// 编码解析结果
#[derive(Debug, Clone, Copy)]
pub struct Resolution {
    pub encoding: &'static Encoding,
    pub source: EncodingSource,
}

/// 解码后的文本及其来源信息
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static Encoding,
    pub source: EncodingSource,
    /// 候选编码解码失败后是否降级为 UTF-8
    pub downgraded: bool,
}

/// 规范化编码别名
///
/// GB2312/GBK/GB18030 统一视为 GBK 解码器，`utf8` 视为 `utf-8`，
/// 其余交给 WHATWG 标签表处理。无法识别时返回 `None`。
pub fn normalize_label(label: &str) -> Option<&'static Encoding> {
    let label = label
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_ascii_lowercase();

    match label.as_str() {
        "" => None,
        "gb2312" | "gbk" | "gb18030" | "x-gbk" | "cp936" => Some(GBK),
        "utf8" | "utf-8" => Some(UTF_8),
        other => Encoding::for_label(other.as_bytes()),
    }
}

/// 字符编码解析器
///
/// 按 传输头 → meta 声明 → 字节探测（可选）→ 地区默认 的顺序确定编码，
/// 解码永不失败：候选编码遇到非法字节时降级为 UTF-8。
#[derive(Debug, Clone)]
pub struct EncodingResolver {
    fallback: &'static Encoding,
    sniff_limit: usize,
    detect_unlabeled: bool,
}

impl Default for EncodingResolver {
    fn default() -> Self {
        Self {
            fallback: GBK,
            sniff_limit: 2048,
            detect_unlabeled: false,
        }
    }
}

impl EncodingResolver {
    pub fn new(settings: &EncodingSettings) -> Self {
        let fallback = normalize_label(&settings.fallback).unwrap_or_else(|| {
            warn!(
                "Unknown fallback encoding '{}', using GBK instead",
                settings.fallback
            );
            GBK
        });

        Self {
            fallback,
            sniff_limit: settings.sniff_limit,
            detect_unlabeled: settings.detect_unlabeled,
        }
    }

    /// 确定字节流应使用的编码
    pub fn resolve(&self, bytes: &[u8], content_type: Option<&str>) -> Resolution {
        if let Some(encoding) = content_type.and_then(charset_from_header) {
            return Resolution {
                encoding,
                source: EncodingSource::Header,
            };
        }

        let head = &bytes[..bytes.len().min(self.sniff_limit)];
        if let Some(encoding) = charset_from_meta(head) {
            return Resolution {
                encoding,
                source: EncodingSource::Meta,
            };
        }

        if self.detect_unlabeled {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            let encoding = detector.guess(None, true);
            debug!("chardetng guessed {}", encoding.name());
            return Resolution {
                encoding,
                source: EncodingSource::Detected,
            };
        }

        Resolution {
            encoding: self.fallback,
            source: EncodingSource::Fallback,
        }
    }

    /// 将字节解码为文本
    pub fn decode(&self, bytes: &[u8], content_type: Option<&str>) -> String {
        self.decode_detailed(bytes, content_type).text
    }

    pub fn decode_detailed(&self, bytes: &[u8], content_type: Option<&str>) -> DecodedText {
        let Resolution { encoding, source } = self.resolve(bytes, content_type);
        debug!(
            "Decoding {} bytes as {} (source: {:?})",
            bytes.len(),
            encoding.name(),
            source
        );

        match encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            Some(text) => DecodedText {
                text: strip_bom(&text).to_string(),
                encoding,
                source,
                downgraded: false,
            },
            None => {
                warn!(
                    "Malformed {} content ({:?}), falling back to UTF-8",
                    encoding.name(),
                    source
                );
                let text = String::from_utf8_lossy(bytes);
                DecodedText {
                    text: strip_bom(&text).to_string(),
                    encoding: UTF_8,
                    source,
                    downgraded: true,
                }
            }
        }
    }
}

fn charset_from_header(content_type: &str) -> Option<&'static Encoding> {
    HEADER_CHARSET
        .captures(content_type)
        .and_then(|caps| caps.get(1))
        .and_then(|m| normalize_label(m.as_str()))
}

fn charset_from_meta(head: &[u8]) -> Option<&'static Encoding> {
    let caps = META_CHARSET.captures(head)?;
    let label = std::str::from_utf8(caps.get(1)?.as_bytes()).ok()?;
    normalize_label(label)
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}
