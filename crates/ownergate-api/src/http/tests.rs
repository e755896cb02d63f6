//! HTTP router tests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
};
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt; // for oneshot

use ownergate_server::config::ServerConfig;
use ownergate_storage::{DataStore, MemoryDataStore, NewNews};

use super::routes::{create_router, create_router_with_observability, error_codes};
use super::state::AppState;
use crate::middleware::REQUEST_ID_HEADER;
use crate::observability::MetricsState;

const IDENTITY: &str = "x-authenticated-user";

/// Helper to create a test app with in-memory storage.
fn test_app() -> axum::Router {
    create_router(AppState::new(MemoryDataStore::new_shared()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, user: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header(IDENTITY, user);
    }
    builder.body(body.into()).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_returns_ok() {
    let response = test_app().oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_ready_reports_storage() {
    let response = test_app().oneshot(get("/ready")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["status"], "ready");
    assert_eq!(json["checks"]["storage"], "ok");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = test_app().oneshot(get("/admin/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["code"], error_codes::NOT_FOUND);
    assert!(json.get("errors").is_none());
}

#[tokio::test]
async fn test_blank_identity_header_is_bad_request() {
    let request = Request::builder()
        .uri("/notes/list/")
        .header(IDENTITY, "   ")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], error_codes::VALIDATION_ERROR);
}

#[tokio::test]
async fn test_non_text_identity_header_is_bad_request() {
    let request = Request::builder()
        .uri("/notes/list/")
        .header(IDENTITY, HeaderValue::from_bytes(b"\xfeauthor").unwrap())
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_anonymous_is_redirected_with_next() {
    let response = test_app().oneshot(get("/notes/add/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/auth/login/?next=/notes/add/"
    );
}

#[tokio::test]
async fn test_configured_login_path_and_header_are_used() {
    let mut config = ServerConfig::default();
    config.auth.identity_header = "x-remote-user".to_string();
    config.auth.login_path = "/login/".to_string();
    let app = create_router(AppState::with_config(MemoryDataStore::new_shared(), &config));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/notes/list/")
                .header(IDENTITY, "author")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/login/?next=/notes/list/");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/notes/list/")
                .header("x-remote-user", "author")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let response = test_app()
        .oneshot(post_json("/notes/add/", Some("author"), "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], error_codes::VALIDATION_ERROR);
}

#[tokio::test]
async fn test_malformed_news_id_is_bad_request() {
    let response = test_app().oneshot(get("/news/abc/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = ServerConfig::default();
    config.server.body_limit_bytes = 64;
    let app = create_router(AppState::with_config(MemoryDataStore::new_shared(), &config));

    let body = serde_json::json!({ "title": "t", "text": "x".repeat(256) }).to_string();
    let response = app
        .oneshot(post_json("/notes/add/", Some("author"), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_news_page_lists_stored_news() {
    let storage = MemoryDataStore::new_shared();
    let news = storage
        .create_news(NewNews::new("Заголовок", "Текст"))
        .await
        .unwrap();
    let app = create_router(AppState::new(Arc::clone(&storage)));

    let response = app.oneshot(get("/news/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["news"][0]["id"], news.id);
    assert_eq!(json["news"][0]["title"], "Заголовок");
}

#[tokio::test]
async fn test_metrics_endpoint_with_observability() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let metrics_state = MetricsState::new(recorder.handle());
    let app = create_router_with_observability(
        AppState::new(MemoryDataStore::new_shared()),
        Some(metrics_state),
    );

    let response = app.oneshot(get("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}

#[tokio::test]
async fn test_metrics_endpoint_absent_without_state() {
    let app =
        create_router_with_observability(AppState::new(MemoryDataStore::new_shared()), None);

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app =
        create_router_with_observability(AppState::new(MemoryDataStore::new_shared()), None);

    let response = app.oneshot(get("/notes/add/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}
