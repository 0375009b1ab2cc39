// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::RetrievalSettings;
use crate::engines::traits::{EngineError, HttpTransport, RawResponse};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// 单次尝试的记录，仅用于日志
struct RetrievalAttempt<'a> {
    url: &'a str,
    timeout: Duration,
    attempt_index: usize,
    outcome: Result<u16, String>,
}

impl fmt::Display for RetrievalAttempt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GET {} attempt #{} (timeout {}ms): ",
            self.url,
            self.attempt_index + 1,
            self.timeout.as_millis()
        )?;
        match &self.outcome {
            Ok(status) => write!(f, "status {}", status),
            Err(e) => write!(f, "{}", e),
        }
    }
}

/// 带递增超时与线性退避的获取客户端
///
/// 第 *i* 次尝试使用超时表中的第 *i* 项，尝试次数等于超时表长度。
/// 只有网络层瞬时故障会被重试，状态码错误和无效URL立即返回。
#[derive(Clone)]
pub struct RetrievalClient {
    transport: Arc<dyn HttpTransport>,
    timeouts: Vec<Duration>,
    base_delay: Duration,
}

impl RetrievalClient {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &RetrievalSettings) -> Self {
        Self::with_schedule(transport, settings.timeouts(), settings.base_delay())
    }

    pub fn with_schedule(
        transport: Arc<dyn HttpTransport>,
        timeouts: Vec<Duration>,
        base_delay: Duration,
    ) -> Self {
        let timeouts = if timeouts.is_empty() {
            vec![DEFAULT_TIMEOUT]
        } else {
            timeouts
        };

        Self {
            transport,
            timeouts,
            base_delay,
        }
    }

    /// 最大尝试次数
    pub fn max_attempts(&self) -> usize {
        self.timeouts.len()
    }

    /// 获取URL的原始字节
    ///
    /// # 返回值
    ///
    /// * `Ok(RawResponse)` - 状态码位于 [200, 400) 的响应
    /// * `Err(EngineError)` - 终止错误，或重试耗尽后的最后一个瞬时错误
    pub async fn fetch(&self, url: &str) -> Result<RawResponse, EngineError> {
        url::Url::parse(url).map_err(|e| EngineError::InvalidUrl(format!("{}: {}", url, e)))?;

        let mut last_error = None;

        for (attempt_index, timeout) in self.timeouts.iter().copied().enumerate() {
            let result = self.transport.get(url, timeout).await.and_then(|response| {
                if response.is_success() {
                    Ok(response)
                } else {
                    Err(EngineError::Status(response.status))
                }
            });

            let attempt = RetrievalAttempt {
                url,
                timeout,
                attempt_index,
                outcome: result
                    .as_ref()
                    .map(|r| r.status)
                    .map_err(ToString::to_string),
            };

            match result {
                Ok(response) => {
                    debug!("{}", attempt);
                    return Ok(response);
                }
                Err(e) if e.is_retryable() => {
                    warn!("Transient failure, {}", attempt);
                    let has_next = attempt_index + 1 < self.timeouts.len();
                    last_error = Some(e);
                    if has_next {
                        tokio::time::sleep(self.backoff(attempt_index)).await;
                    }
                }
                Err(e) => {
                    warn!("Terminal failure, {}", attempt);
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EngineError::Terminal(format!("No retrieval attempt was made for {}", url))
        }))
    }

    /// 第 `attempt_index` 次失败后的退避时间
    pub fn backoff(&self, attempt_index: usize) -> Duration {
        self.base_delay * (attempt_index as u32 + 1)
    }
}

#[cfg(test)]
#[path = "retrieval_client_test.rs"]
mod tests;
