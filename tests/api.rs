//! Router-level tests: system routes, auth rejection and validation,
//! driven with `oneshot` against an app whose store is never reached.

#![allow(clippy::panic)]

mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use serde_json::{Value, json};
use tower::ServiceExt;

use sports_events::ai::GeminiClient;
use sports_events::api;

const GOOD_TOKEN: &str = "Bearer good-token";

async fn stub_user(headers: HeaderMap) -> Response {
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(GOOD_TOKEN) => Json(json!({
            "id": "7d1f1b9e-4a57-4d8b-9a53-0c4bd1e0a001",
            "email": "player@example.com"
        }))
        .into_response(),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({"msg": "invalid JWT"}))).into_response(),
    }
}

async fn stub_token() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "invalid_grant", "error_description": "Invalid login credentials"})),
    )
        .into_response()
}

async fn stub_logout(headers: HeaderMap) -> StatusCode {
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(GOOD_TOKEN) => StatusCode::NO_CONTENT,
        _ => StatusCode::UNAUTHORIZED,
    }
}

async fn test_app() -> Router {
    let auth = Router::new()
        .route("/user", get(stub_user))
        .route("/token", post(stub_token))
        .route("/logout", post(stub_logout));
    let auth_url = common::spawn_stub(auth).await;
    let gemini = GeminiClient::new("http://127.0.0.1:1", "test-model", None);
    api::app(common::offline_state(&auth_url, gemini))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap_or_else(|never| match never {});
    let status = response.status();
    let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
        panic!("failed to read body");
    };
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, token);
    }
    let Ok(request) = builder.body(Body::empty()) else {
        panic!("invalid request");
    };
    request
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, token);
    }
    let Ok(request) = builder.body(Body::from(body.to_string())) else {
        panic!("invalid request");
    };
    request
}

fn raw_request(method: &str, uri: &str, token: &str, body: &'static str) -> Request<Body> {
    let Ok(request) = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, token)
        .body(Body::from(body))
    else {
        panic!("invalid request");
    };
    request
}

fn error_code(body: &Value) -> Option<u64> {
    body.get("error").and_then(|e| e.get("code")).and_then(Value::as_u64)
}

#[tokio::test]
async fn health_reports_healthy() {
    let (status, body) = send(test_app().await, get_request("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status"), Some(&json!("healthy")));
}

#[tokio::test]
async fn sports_config_lists_vocabulary_and_filters() {
    let (status, body) = send(test_app().await, get_request("/config/sports", None)).await;
    assert_eq!(status, StatusCode::OK);
    let sports = body.get("sports").and_then(Value::as_array).cloned().unwrap_or_default();
    assert_eq!(sports.len(), 9);
    assert!(sports.contains(&json!("Pickleball")));
    let filters = body.get("dateFilters").and_then(Value::as_array).cloned().unwrap_or_default();
    assert!(filters.contains(&json!("upcoming")));
}

#[tokio::test]
async fn events_require_a_bearer_token() {
    let (status, body) = send(test_app().await, get_request("/api/v1/events", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body.get("error").and_then(|e| e.get("message")),
        Some(&json!("Unauthorized"))
    );
}

#[tokio::test]
async fn rejected_token_is_unauthorized() {
    let request = get_request("/api/v1/events", Some("Bearer expired"));
    let (status, body) = send(test_app().await, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), Some(2001));
}

#[tokio::test]
async fn malformed_event_id_is_a_json_error() {
    let request = get_request("/api/v1/events/not-a-uuid", Some(GOOD_TOKEN));
    let (status, body) = send(test_app().await, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some(1002));
}

#[tokio::test]
async fn malformed_body_is_a_json_error() {
    let request = raw_request("POST", "/api/v1/events", GOOD_TOKEN, "{not json");
    let (status, body) = send(test_app().await, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some(1002));
    let message = body.get("error").and_then(|e| e.get("message")).and_then(Value::as_str);
    assert!(message.is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn mistyped_body_field_is_a_json_error() {
    let request = raw_request(
        "PUT",
        "/api/v1/events/7d1f1b9e-4a57-4d8b-9a53-0c4bd1e0a002",
        GOOD_TOKEN,
        r#"{"name": 7}"#,
    );
    let (status, body) = send(test_app().await, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some(1002));
}

#[tokio::test]
async fn invalid_submission_fails_before_store() {
    let submission = json!({
        "name": "",
        "sport": "Basketball",
        "dateTime": "tomorrow-ish",
        "venueNames": []
    });
    let request = json_request("POST", "/api/v1/events", Some(GOOD_TOKEN), &submission);
    let (status, body) = send(test_app().await, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some(1001));

    let details = body
        .get("error")
        .and_then(|e| e.get("details"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let fields: Vec<&str> = details
        .iter()
        .filter_map(|d| d.get("field").and_then(Value::as_str))
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"dateTime"));
    assert!(fields.contains(&"venueNames"));
}

#[tokio::test]
async fn assistant_without_key_fails_closed() {
    let chat = json!({"messages": [{"role": "user", "content": "Tennis on Saturday"}]});
    let request = json_request("POST", "/api/v1/assistant/chat", Some(GOOD_TOKEN), &chat);
    let (status, body) = send(test_app().await, request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error_code(&body), Some(4001));
}

#[tokio::test]
async fn confirm_requires_core_fields() {
    let confirm = json!({"event": {"name": "Pickup Game"}});
    let request = json_request("POST", "/api/v1/assistant/events", Some(GOOD_TOKEN), &confirm);
    let (status, body) = send(test_app().await, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body.get("error").and_then(|e| e.get("message")).and_then(Value::as_str);
    assert!(message.is_some_and(|m| m.starts_with("Missing required fields")));
}

#[tokio::test]
async fn bad_credentials_get_helpful_message() {
    let credentials = json!({"email": "player@example.com", "password": "wrong"});
    let request = json_request("POST", "/api/v1/auth/signin", None, &credentials);
    let (status, body) = send(test_app().await, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body.get("error").and_then(|e| e.get("message")).and_then(Value::as_str);
    assert!(message.is_some_and(|m| m.starts_with("Invalid email or password")));
}

#[tokio::test]
async fn empty_credentials_are_rejected_locally() {
    let credentials = json!({"email": "", "password": ""});
    let request = json_request("POST", "/api/v1/auth/signup", None, &credentials);
    let (status, body) = send(test_app().await, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), Some(1002));
}

#[tokio::test]
async fn sign_out_revokes_the_callers_session() {
    let request = json_request("POST", "/api/v1/auth/signout", Some(GOOD_TOKEN), &json!({}));
    let (status, _) = send(test_app().await, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn sign_out_rejects_an_unknown_token() {
    let request = json_request("POST", "/api/v1/auth/signout", Some("Bearer expired"), &json!({}));
    let (status, body) = send(test_app().await, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), Some(2001));
}

#[tokio::test]
async fn oauth_url_points_at_provider() {
    let (status, body) = send(test_app().await, get_request("/api/v1/auth/oauth/google", None)).await;
    assert_eq!(status, StatusCode::OK);
    let url = body.get("url").and_then(Value::as_str).unwrap_or_default();
    assert!(url.contains("/authorize?provider=google"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = send(test_app().await, get_request(api::OPENAPI_PATH, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("paths").and_then(|p| p.get("/api/v1/events")).is_some());
}
