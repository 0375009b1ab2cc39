// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 搜索服务（search_service）：校验输入、包装目录错误并驱动批量详情抓取
pub mod search_service;
