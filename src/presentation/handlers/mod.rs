// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 每个处理器把请求交给对应的服务，再把结果转换为响应
pub mod cover_handler;
pub mod search_handler;
