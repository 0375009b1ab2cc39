// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 规范化页面中出现的链接，失败时返回空字符串
///
/// 协议相对地址（`//host/x`）统一补全为 https
pub fn absolutize(base_url: &Url, raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("javascript:") || raw.starts_with("data:") {
        return String::new();
    }

    if let Some(rest) = raw.strip_prefix("//") {
        return format!("https://{}", rest);
    }

    resolve_url(base_url, raw)
        .map(|u| u.to_string())
        .unwrap_or_default()
}

/// 通过图片代理模板包装封面地址以绕过防盗链
///
/// 模板中的 `{url}` 会被替换为百分号编码后的原地址；模板不含占位符时原样拼接
pub fn proxy_image_url(template: &str, image_url: &str) -> String {
    if image_url.is_empty() || template.is_empty() {
        return image_url.to_string();
    }

    let encoded = urlencoding::encode(image_url);
    if template.contains("{url}") {
        template.replace("{url}", &encoded)
    } else {
        format!("{}{}", template, encoded)
    }
}
