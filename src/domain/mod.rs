// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：书目搜索结果与详情元数据
/// - 目录接口（search）：书目目录站点的抽象
/// - 服务（services）：搜索、详情抓取与结果补全
pub mod models;
pub mod search;
pub mod services;
