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

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// 可重试的网络故障类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientKind {
    /// 建立连接超时
    ConnectTimeout,
    /// 连接被重置或中断
    ConnectionReset,
    /// 域名解析失败
    DnsNotFound,
    /// 请求整体超时（ECONNABORTED）
    Aborted,
}

impl fmt::Display for TransientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransientKind::ConnectTimeout => "ETIMEDOUT",
            TransientKind::ConnectionReset => "ECONNRESET",
            TransientKind::DnsNotFound => "ENOTFOUND",
            TransientKind::Aborted => "ECONNABORTED",
        };
        f.write_str(name)
    }
}

/// 引擎错误类型
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    /// 网络层瞬时故障，可重试
    #[error("Transient network error ({kind}): {message}")]
    Transient { kind: TransientKind, message: String },
    /// 状态码不在 [200, 400) 范围内
    #[error("HTTP status {0}")]
    Status(u16),
    /// 无效的URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// 其他不可重试的错误
    #[error("Request failed: {0}")]
    Terminal(String),
}

impl EngineError {
    /// 判断错误是否可重试
    ///
    /// # 返回值
    ///
    /// 只有网络层瞬时故障返回true
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Transient { .. })
    }

    pub fn transient(kind: TransientKind, message: impl Into<String>) -> Self {
        EngineError::Transient {
            kind,
            message: message.into(),
        }
    }
}

/// 未解码的原始响应
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP状态码
    pub status: u16,
    /// 响应头（键为小写）
    pub headers: HashMap<String, String>,
    /// 原始字节
    pub body: Bytes,
}

impl RawResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// HTTP传输特质
///
/// 执行单次 GET 请求，不做重试也不检查状态码
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// 在给定超时内执行一次请求
    async fn get(&self, url: &str, timeout: Duration) -> Result<RawResponse, EngineError>;

    /// 传输名称
    fn name(&self) -> &'static str;
}
