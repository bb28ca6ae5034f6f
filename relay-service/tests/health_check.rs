//! Integration tests for the operational endpoints.

mod common;

use common::{refused_url, spawn_app, test_config, GENERATE_PATH};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn health_check_returns_ok() {
    let url = refused_url().await;
    let app = spawn_app(test_config(&url, 30)).await;

    let response = app.get("/health").await;

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "relay-service");
}

#[tokio::test]
async fn readiness_check_returns_ok_when_upstream_answers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Ollama is running"))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}{}", server.uri(), GENERATE_PATH);
    let app = spawn_app(test_config(&url, 30)).await;

    let response = app.get("/ready").await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ready" }));
}

#[tokio::test]
async fn readiness_check_fails_when_upstream_unreachable() {
    let url = refused_url().await;
    let app = spawn_app(test_config(&url, 30)).await;

    let response = app.get("/ready").await;

    assert_eq!(response.status(), 503);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "unavailable");
}

#[tokio::test]
async fn metrics_endpoint_exposes_request_counters() {
    let url = refused_url().await;
    let app = spawn_app(test_config(&url, 30)).await;

    // One relayed call so the counters have something to report.
    let response = app.post_json("/generate", &json!({ "prompt": "hi" })).await;
    assert_eq!(response.status(), 502);

    let response = app.get("/metrics").await;
    assert_eq!(response.status(), 200);

    let text = response.text().await.unwrap();
    assert!(text.contains("http_requests_total"));
    assert!(text.contains("relay_upstream_requests_total"));
}

#[tokio::test]
async fn responses_carry_a_generated_request_id() {
    let url = refused_url().await;
    let app = spawn_app(test_config(&url, 30)).await;

    let response = app.get("/health").await;

    let id = response
        .headers()
        .get("x-request-id")
        .expect("missing x-request-id")
        .to_str()
        .unwrap();
    assert!(!id.is_empty());
}
