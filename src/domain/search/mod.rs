// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 目录领域模块
///
/// 定义书目目录站点接口及其错误类型
pub mod engine;
