// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CoverSettings;
use crate::engines::retrieval_client::RetrievalClient;
use crate::engines::traits::EngineError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

/// 文件名中保留的哈希前缀长度
const HASH_PREFIX_LEN: usize = 12;
/// 标题部分的最大字符数
const MAX_STEM_CHARS: usize = 64;

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Cover fetch failed: {0}")]
    Fetch(#[from] EngineError),
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 封面下载器
///
/// 下载封面图，按最大宽度等比缩小后以 JPEG 写入本地目录
pub struct CoverDownloader {
    retrieval: RetrievalClient,
    output_dir: PathBuf,
    max_width: u32,
    quality: u8,
}

impl CoverDownloader {
    pub fn new(retrieval: RetrievalClient, settings: &CoverSettings) -> Self {
        Self {
            retrieval,
            output_dir: settings.output_dir.clone(),
            max_width: settings.max_width.max(1),
            quality: settings.quality.clamp(1, 100),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 下载并保存封面
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 保存后的 `file://` URI
    /// * `Err(CoverError)` - 下载、解码或写入失败
    pub async fn download_cover(
        &self,
        url: &str,
        title: Option<&str>,
    ) -> Result<String, CoverError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(CoverError::Validation(
                "cover url cannot be empty".to_string(),
            ));
        }

        let response = self.retrieval.fetch(url).await?;
        debug!("Fetched cover {} ({} bytes)", url, response.body.len());

        let body = response.body;
        let max_width = self.max_width;
        let quality = self.quality;
        let encoded = tokio::task::spawn_blocking(move || shrink_to_jpeg(&body, max_width, quality))
            .await
            .map_err(std::io::Error::other)??;

        fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(cover_file_name(url, title));

        let mut file = fs::File::create(&path).await?;
        file.write_all(&encoded).await?;
        file.flush().await?;

        let absolute = fs::canonicalize(&path).await?;
        let uri = Url::from_file_path(&absolute).map_err(|_| {
            std::io::Error::other(format!("not an absolute path: {}", absolute.display()))
        })?;

        info!("Saved cover to {}", absolute.display());
        Ok(uri.to_string())
    }
}

/// 解码图片，宽度超过上限时等比缩小，再编码为 JPEG
pub fn shrink_to_jpeg(bytes: &[u8], max_width: u32, quality: u8) -> Result<Vec<u8>, CoverError> {
    let image = image::load_from_memory(bytes)?;
    let (width, height) = image.dimensions();

    let image = if width > max_width {
        let scaled_height = ((height as u64 * max_width as u64) / width as u64).max(1) as u32;
        image.resize_exact(max_width, scaled_height, FilterType::Triangle)
    } else {
        image
    };

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
    Ok(buffer)
}

/// `{标题或 cover}-{URL 的 sha256 前缀}.jpg`
pub fn cover_file_name(url: &str, title: Option<&str>) -> String {
    let digest = hex::encode(Sha256::digest(url.as_bytes()));
    let stem = title.map(sanitize_title).unwrap_or_default();
    let stem = if stem.is_empty() {
        "cover".to_string()
    } else {
        stem
    };
    format!("{}-{}.jpg", stem, &digest[..HASH_PREFIX_LEN])
}

fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_STEM_CHARS)
        .collect();
    cleaned.trim_matches('_').to_string()
}
