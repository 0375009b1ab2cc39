// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、目录站点、网络重试、编码、并发控制和封面存储等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 目录站点配置
    pub catalog: CatalogSettings,
    /// 网络重试配置
    pub retrieval: RetrievalSettings,
    /// 字符编码配置
    pub encoding: EncodingSettings,
    /// 并发控制配置
    pub concurrency: ConcurrencySettings,
    /// 封面存储配置
    pub cover: CoverSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 目录站点配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    /// 目录站点根地址
    pub base_url: String,
    /// 图片代理模板，`{url}` 会被替换为编码后的封面地址
    pub image_proxy: String,
    /// 单次搜索返回的最大结果数
    pub max_results: usize,
    /// 轮换使用的 User-Agent 列表
    #[serde(default)]
    pub user_agents: Vec<String>,
}

/// 网络重试配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalSettings {
    /// 逐次递增的超时时间（毫秒），长度即最大尝试次数
    pub timeouts_ms: Vec<u64>,
    /// 线性退避的基础延迟（毫秒）
    pub base_delay_ms: u64,
}

impl RetrievalSettings {
    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts_ms
            .iter()
            .map(|ms| Duration::from_millis(*ms))
            .collect()
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// 字符编码配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct EncodingSettings {
    /// 无任何声明时使用的地区默认编码
    pub fallback: String,
    /// 嗅探 meta 声明时扫描的字节数
    pub sniff_limit: usize,
    /// 是否在无声明时启用字节级编码探测
    pub detect_unlabeled: bool,
}

/// 并发控制配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ConcurrencySettings {
    /// 批量请求的默认并发数
    pub default_limit: usize,
    /// 调用方可请求的最大并发数
    pub max_limit: usize,
}

impl ConcurrencySettings {
    /// 将调用方请求的并发数限制在 `[1, max_limit]` 区间内
    pub fn clamp(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_limit)
            .clamp(1, self.max_limit.max(1))
    }
}

/// 封面存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CoverSettings {
    /// 封面输出目录
    pub output_dir: PathBuf,
    /// 最大宽度（像素）
    pub max_width: u32,
    /// JPEG 质量 (1-100)
    pub quality: u8,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("BOOKSCOUT")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("retrieval.timeouts_ms"),
            )
            .build()?
            .try_deserialize()
    }

    /// 仅使用内置默认值构建配置（测试和嵌入场景使用）
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            // Catalog site
            .set_default("catalog.base_url", "https://catalog.example.com")?
            .set_default("catalog.image_proxy", "https://images.weserv.nl/?url={url}")?
            .set_default("catalog.max_results", 20)?
            .set_default("catalog.user_agents", Vec::<String>::new())?
            // Retry schedule
            .set_default("retrieval.timeouts_ms", vec![10_000i64, 15_000, 20_000])?
            .set_default("retrieval.base_delay_ms", 1000)?
            // Encoding
            .set_default("encoding.fallback", "gbk")?
            .set_default("encoding.sniff_limit", 2048)?
            .set_default("encoding.detect_unlabeled", false)?
            // Concurrency
            .set_default("concurrency.default_limit", 3)?
            .set_default("concurrency.max_limit", 8)?
            // Cover storage
            .set_default("cover.output_dir", "./covers")?
            .set_default("cover.max_width", 300)?
            .set_default("cover.quality", 80)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
