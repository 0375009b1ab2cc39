// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 包含的子模块：
/// - 目录（catalog）：目录站点客户端、字段提取和标签同义词表
/// - 存储（storage）：封面下载与本地保存
pub mod catalog;
pub mod storage;
