// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::queue::cancellation::CancellationToken;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use thiserror::Error;
use tracing::{debug, warn};

/// 进度回调：`(已完成数, 总数)`
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

/// 单个任务的失败原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError<E> {
    /// 任务返回了错误
    #[error("task failed: {0}")]
    Failed(E),
    /// 任务发生 panic
    #[error("task panicked: {0}")]
    Panicked(String),
    /// 取消后未派发
    #[error("task cancelled before start")]
    Cancelled,
}

/// 按提交顺序排列的任务结果
pub type ExecutionReport<T, E> = Vec<Result<T, TaskError<E>>>;

/// 有界并发执行器
///
/// 任意时刻最多有 `min(concurrency, 任务数)` 个任务在运行，
/// 任一任务结束后立即派发下一个（滑动窗口）。
/// 任务失败只写入自己的结果槽位，不影响其它任务，也不会让整个调用失败。
#[derive(Debug, Clone)]
pub struct ConcurrencyExecutor {
    concurrency: usize,
    cancel: CancellationToken,
}

impl ConcurrencyExecutor {
    /// # 参数
    ///
    /// * `concurrency` - 最大并发数，0 按 1 处理
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            cancel: CancellationToken::new(),
        }
    }

    /// 使用外部取消令牌
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// 执行一批任务
    ///
    /// 每个任务都会收到取消令牌的克隆。返回值长度等于任务数，
    /// 下标与提交顺序一致；`on_progress` 在每个任务的结果写入之后调用。
    pub async fn run<T, E, F, Fut>(
        &self,
        tasks: Vec<F>,
        on_progress: Option<ProgressFn<'_>>,
    ) -> ExecutionReport<T, E>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let total = tasks.len();
        if total == 0 {
            return Vec::new();
        }

        let limit = self.concurrency.min(total);
        debug!("Running {} tasks with concurrency {}", total, limit);

        let mut slots: Vec<Option<Result<T, TaskError<E>>>> = (0..total).map(|_| None).collect();

        let mut in_flight = stream::iter(tasks.into_iter().enumerate().map(|(index, task)| {
            let token = self.cancel.clone();
            async move {
                if token.is_cancelled() {
                    return (index, Err(TaskError::Cancelled));
                }

                let outcome = AssertUnwindSafe(async move { task(token).await })
                    .catch_unwind()
                    .await;

                let result = match outcome {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(e)) => Err(TaskError::Failed(e)),
                    Err(payload) => {
                        let message = panic_message(payload);
                        warn!("Task {} panicked: {}", index, message);
                        Err(TaskError::Panicked(message))
                    }
                };
                (index, result)
            }
        }))
        .buffer_unordered(limit);

        let mut completed = 0;
        while let Some((index, result)) = in_flight.next().await {
            slots[index] = Some(result);
            completed += 1;
            if let Some(progress) = on_progress {
                progress(completed, total);
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or(Err(TaskError::Cancelled)))
            .collect()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
