//! Integration Tests for the proxy
//!
//! Drives the full router against a mock origin and an on-disk cache.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use httpmock::prelude::*;
use httpmock::Method::HEAD;
use mirror_cache::{api::create_router, cache::CacheKey, AppState, Config};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

const JAN_2019: &str = "Tue, 01 Jan 2019 00:00:00 GMT";

// == Helper Functions ==

fn create_app(config: &Config) -> Router {
    create_router(AppState::from_config(config).unwrap())
}

fn proxy_request(source: &str) -> Request<Body> {
    Request::builder()
        .uri("/file.bin")
        .header("File", source)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

// == Freshness Tests ==

#[tokio::test]
async fn test_unchanged_origin_is_fetched_once() {
    let server = MockServer::start_async().await;
    let head = server
        .mock_async(|when, then| {
            when.method(HEAD).path("/file.bin");
            then.status(200).header("Last-Modified", JAN_2019);
        })
        .await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET).path("/file.bin");
            then.status(200).body("B1");
        })
        .await;

    let dir = TempDir::new().unwrap();
    let app = create_app(&Config::with_cache_path(dir.path()));
    let source = server.url("/file.bin");

    let first = app.clone().oneshot(proxy_request(&source)).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(body_bytes(first.into_body()).await, b"B1");

    let second = app.oneshot(proxy_request(&source)).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_bytes(second.into_body()).await, b"B1");

    head.assert_calls_async(2).await;
    get.assert_calls_async(1).await;

    // Blob and freshness record are laid out by key
    let key = CacheKey::derive(&source);
    assert_eq!(std::fs::read(dir.path().join(key.as_str())).unwrap(), b"B1");
    assert_eq!(
        std::fs::read_to_string(dir.path().join(format!("{}.index", key))).unwrap(),
        "1546300800"
    );
}

#[tokio::test]
async fn test_changed_timestamp_triggers_refetch() {
    let server = MockServer::start_async().await;
    let mut head = server
        .mock_async(|when, then| {
            when.method(HEAD).path("/file.bin");
            then.status(200).header("Last-Modified", JAN_2019);
        })
        .await;
    let mut get = server
        .mock_async(|when, then| {
            when.method(GET).path("/file.bin");
            then.status(200).body("B1");
        })
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = Config::with_cache_path(dir.path());
    config.atomic_writes = true;
    let app = create_app(&config);
    let source = server.url("/file.bin");

    let first = app.clone().oneshot(proxy_request(&source)).await.unwrap();
    assert_eq!(body_bytes(first.into_body()).await, b"B1");

    head.delete_async().await;
    get.delete_async().await;
    head = server
        .mock_async(|when, then| {
            when.method(HEAD).path("/file.bin");
            then.status(200)
                .header("Last-Modified", "Mon, 31 Dec 2018 00:00:00 GMT");
        })
        .await;
    get = server
        .mock_async(|when, then| {
            when.method(GET).path("/file.bin");
            then.status(200).body("B0");
        })
        .await;

    let second = app.oneshot(proxy_request(&source)).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_bytes(second.into_body()).await, b"B0");
    head.assert_calls_async(1).await;
    get.assert_calls_async(1).await;
}

#[tokio::test]
async fn test_origin_without_last_modified() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/plain");
            then.status(200);
        })
        .await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET).path("/plain");
            then.status(200).body("static");
        })
        .await;

    let dir = TempDir::new().unwrap();
    let app = create_app(&Config::with_cache_path(dir.path()));
    let source = server.url("/plain");

    for _ in 0..3 {
        let response = app.clone().oneshot(proxy_request(&source)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response.into_body()).await, b"static");
    }
    get.assert_calls_async(1).await;
}

// == Error Mapping Tests ==

#[tokio::test]
async fn test_missing_source_header() {
    let dir = TempDir::new().unwrap();
    let app = create_app(&Config::with_cache_path(dir.path()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/anything")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("source identifier not provided"));
}

#[tokio::test]
async fn test_malformed_last_modified_is_bad_request() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/odd");
            then.status(200).header("Last-Modified", "the other day");
        })
        .await;

    let dir = TempDir::new().unwrap();
    let app = create_app(&Config::with_cache_path(dir.path()));

    let response = app.oneshot(proxy_request(&server.url("/odd"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreachable_origin_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = create_app(&Config::with_cache_path(dir.path()));

    let response = app
        .oneshot(proxy_request("http://127.0.0.1:1/file.bin"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unwritable_cache_is_server_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/file.bin");
            then.status(200).header("Last-Modified", JAN_2019);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/file.bin");
            then.status(200).body("B1");
        })
        .await;

    // Cache directory was never created
    let dir = TempDir::new().unwrap();
    let app = create_app(&Config::with_cache_path(dir.path().join("missing")));

    let response = app
        .oneshot(proxy_request(&server.url("/file.bin")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("write"));
}

// == Service Endpoint Tests ==

#[tokio::test]
async fn test_stats_reflect_requests() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/file.bin");
            then.status(200).header("Last-Modified", JAN_2019);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/file.bin");
            then.status(200).body("B1");
        })
        .await;

    let dir = TempDir::new().unwrap();
    let app = create_app(&Config::with_cache_path(dir.path()));
    let source = server.url("/file.bin");

    for _ in 0..3 {
        app.clone().oneshot(proxy_request(&source)).await.unwrap();
    }
    app.clone()
        .oneshot(proxy_request("http://127.0.0.1:1/x"))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["requests"], 4);
    assert_eq!(json["refreshes"], 1);
    assert_eq!(json["fresh_hits"], 2);
    assert_eq!(json["request_errors"], 1);
    assert_eq!(json["server_errors"], 0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = create_app(&Config::with_cache_path(dir.path()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
