// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 提供有界并发执行器和协作式取消令牌
pub mod cancellation;
pub mod executor;
