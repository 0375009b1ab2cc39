// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::engines::traits::{EngineError, HttpTransport, RawResponse, TransientKind};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::io;
use std::time::{Duration, Instant};
use tracing::debug;

const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

/// 基于reqwest实现的HTTP传输
///
/// 客户端只构建一次，所有请求共享连接池
pub struct ReqwestTransport {
    client: reqwest::Client,
    user_agents: Vec<String>,
}

impl ReqwestTransport {
    /// 创建传输实例
    ///
    /// # 参数
    ///
    /// * `user_agents` - 轮换使用的 User-Agent，为空时使用内置列表
    pub fn new(user_agents: &[String]) -> Result<Self, EngineError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Accept",
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            "Accept-Language",
            HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
        );
        headers.insert("Cache-Control", HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(|e| EngineError::Terminal(format!("Failed to build HTTP client: {}", e)))?;

        let user_agents = if user_agents.is_empty() {
            DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect()
        } else {
            user_agents.to_vec()
        };

        Ok(Self {
            client,
            user_agents,
        })
    }

    fn pick_user_agent(&self) -> &str {
        &self.user_agents[rand::random_range(0..self.user_agents.len())]
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse, EngineError> {
        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.pick_user_agent())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(&e))?;

        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (k, v) in response.headers() {
            if let Ok(v_str) = v.to_str() {
                headers.insert(k.as_str().to_ascii_lowercase(), v_str.to_string());
            }
        }

        let body = response.bytes().await.map_err(|e| classify_error(&e))?;

        debug!(
            "GET {} -> {} ({} bytes, {}ms)",
            url,
            status,
            body.len(),
            start.elapsed().as_millis()
        );

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

/// 将reqwest错误分类为瞬时或终止错误
pub fn classify_error(err: &reqwest::Error) -> EngineError {
    let message = err.to_string();

    if err.is_builder() {
        return EngineError::InvalidUrl(message);
    }

    if err.is_timeout() {
        return EngineError::transient(TransientKind::Aborted, message);
    }

    if let Some(kind) = io_error_kind(err) {
        match kind {
            io::ErrorKind::TimedOut => {
                return EngineError::transient(TransientKind::ConnectTimeout, message)
            }
            io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted => {
                return EngineError::transient(TransientKind::ConnectionReset, message)
            }
            io::ErrorKind::ConnectionRefused => return EngineError::Terminal(message),
            _ => {}
        }
    }

    if err.is_connect() && source_chain_mentions(err, &["dns error", "failed to lookup address"]) {
        return EngineError::transient(TransientKind::DnsNotFound, message);
    }

    EngineError::Terminal(message)
}

fn io_error_kind(err: &reqwest::Error) -> Option<io::ErrorKind> {
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(inner) = source {
        if let Some(io_err) = inner.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = inner.source();
    }
    None
}

fn source_chain_mentions(err: &reqwest::Error, patterns: &[&str]) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(inner) = source {
        let text = inner.to_string().to_lowercase();
        if patterns.iter().any(|p| text.contains(p)) {
            return true;
        }
        source = inner.source();
    }
    false
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
