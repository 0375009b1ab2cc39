// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use bookscout::engines::traits::{EngineError, TransientKind};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::helpers::fast_retrieval;

#[tokio::test]
async fn test_sustained_timeouts_use_every_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .expect(3)
        .mount(&server)
        .await;

    let client = fast_retrieval(&[100, 100, 100]);
    let err = client
        .fetch(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::Transient {
            kind: TransientKind::Aborted,
            ..
        }
    ));
}

#[tokio::test]
async fn test_terminal_status_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = fast_retrieval(&[500, 500, 500]);
    let err = client
        .fetch(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Status(404)));
}

#[tokio::test]
async fn test_recovers_after_one_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = fast_retrieval(&[100, 1_000, 1_000]);
    let response = client
        .fetch(&format!("{}/flaky", server.uri()))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(&response.body[..], b"ok");
}
