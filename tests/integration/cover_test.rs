// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use bookscout::config::settings::CoverSettings;
use bookscout::infrastructure::storage::cover::{CoverDownloader, CoverError};
use image::GenericImageView;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::helpers::{fast_retrieval, png_bytes};

fn downloader(dir: &std::path::Path) -> CoverDownloader {
    let settings = CoverSettings {
        output_dir: dir.to_path_buf(),
        max_width: 300,
        quality: 80,
    };
    CoverDownloader::new(fast_retrieval(&[2_000]), &settings)
}

#[tokio::test]
async fn test_cover_is_shrunk_and_saved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cover/1.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png_bytes(900, 1200), "image/png"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let uri = downloader(dir.path())
        .download_cover(&format!("{}/cover/1.png", server.uri()), Some("三体"))
        .await
        .unwrap();

    assert!(uri.starts_with("file://"));
    let saved = Url::parse(&uri).unwrap().to_file_path().unwrap();
    assert!(saved.starts_with(dir.path().canonicalize().unwrap()));
    let file_name = saved.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("三体-"));
    assert!(file_name.ends_with(".jpg"));

    let stored = image::open(&saved).unwrap();
    assert_eq!(stored.dimensions(), (300, 400));
}

#[tokio::test]
async fn test_empty_cover_url_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = downloader(dir.path())
        .download_cover("  ", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoverError::Validation(_)));
}

#[tokio::test]
async fn test_missing_cover_is_a_fetch_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let err = downloader(dir.path())
        .download_cover(&format!("{}/cover/404.png", server.uri()), None)
        .await
        .unwrap_err();

    assert!(matches!(err, CoverError::Fetch(_)));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}
