// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 引擎模块
///
/// - 传输接口（traits）：HTTP传输抽象与错误分类
/// - reqwest 实现（reqwest_engine）
/// - 获取客户端（retrieval_client）：按超时表重试的获取流程
pub mod reqwest_engine;
pub mod retrieval_client;
pub mod traits;
