// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use bookscout::config::settings::Settings;
use bookscout::domain::services::search_service::BookSearchService;
use bookscout::infrastructure::storage::cover::CoverDownloader;
use bookscout::presentation::routes;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::helpers::{
    catalog_client, fast_retrieval, png_bytes, DETAIL_PAGE, SANTI_SEARCH_PAGE, SANTI_SEARCH_PATH,
};

fn app(server: &MockServer, cover_dir: &TempDir) -> Router {
    let mut settings = Settings::defaults().unwrap();
    settings.cover.output_dir = cover_dir.path().to_path_buf();

    let retrieval = fast_retrieval(&[2_000]);
    let service = Arc::new(BookSearchService::new(Arc::new(catalog_client(
        &server.uri(),
        retrieval.clone(),
    ))));
    let downloader = Arc::new(CoverDownloader::new(retrieval, &settings.cover));

    routes::routes(service, downloader, Arc::new(settings))
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// 健康检查测试
#[tokio::test]
async fn test_health_check_works() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let (status, body) = call(app(&server, &dir), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_version_reports_crate_version() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let response = app(&server, &dir).oneshot(get("/v1/version")).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    assert_eq!(&bytes[..], env!("CARGO_PKG_VERSION").as_bytes());
}

#[tokio::test]
async fn test_search_returns_tagged_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SANTI_SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(SANTI_SEARCH_PAGE.as_bytes(), "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let (status, body) = call(
        app(&server, &dir),
        get("/v1/search?keyword=%E4%B8%89%E4%BD%93"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["wordCount"], json!(888_000));
    assert_eq!(body["data"][1]["author"], json!("未知作者"));
}

#[tokio::test]
async fn test_blank_search_is_an_empty_success() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let (status, body) = call(app(&server, &dir), get("/v1/search?keyword=%20%20")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": [] }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_search_keeps_empty_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let (status, body) = call(
        app(&server, &dir),
        get("/v1/search?keyword=%E4%B8%89%E4%BD%93"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["data"], json!([]));
    assert!(body["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_empty_detail_url_is_bad_request() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let (status, body) = call(app(&server, &dir), get("/v1/detail?url=")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_batch_details_are_index_aligned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/book/1.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(DETAIL_PAGE.as_bytes(), "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let payload = json!({
        "urls": [
            format!("{}/book/1.html", server.uri()),
            format!("{}/book/2.html", server.uri()),
            ""
        ],
        "concurrency": 2
    });
    let (status, body) = call(app(&server, &dir), post_json("/v1/details", payload)).await;

    assert_eq!(status, StatusCode::OK);
    let outcomes = body["data"].as_array().unwrap();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0]["success"], json!(true));
    assert_eq!(outcomes[0]["data"]["category"], json!("科幻小说"));
    assert_eq!(outcomes[1]["success"], json!(false));
    assert_eq!(outcomes[2]["success"], json!(false));
}

#[tokio::test]
async fn test_cover_endpoint_returns_file_uri() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cover/1.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png_bytes(64, 96), "image/png"))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let payload = json!({ "url": format!("{}/cover/1.png", server.uri()), "title": "三体" });
    let (status, body) = call(app(&server, &dir), post_json("/v1/cover", payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_str().unwrap().starts_with("file://"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_undecodable_cover_is_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cover/broken.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gone</html>"))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let payload = json!({ "url": format!("{}/cover/broken.jpg", server.uri()) });
    let (status, body) = call(app(&server, &dir), post_json("/v1/cover", payload)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
}
