use super::*;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

// =============================================================================
// endpoint
// =============================================================================

#[test]
fn endpoint_joins_base_and_path() {
    assert_eq!(endpoint("http://h/api", "session"), "http://h/api/session");
}

#[test]
fn new_trims_trailing_slash() {
    let service = HttpSessionService::new("http://h/api/", Duration::from_secs(1)).unwrap();
    assert_eq!(service.base_url(), "http://h/api");
}

// =============================================================================
// parse_session_response
// =============================================================================

#[test]
fn session_success_returns_status() {
    let body = r#"{"status":"Success","message":"","data":{"auth":true,"model":"ChatGPTAPI"}}"#;
    let status = parse_session_response(200, body).unwrap();
    assert!(status.auth_required);
    assert_eq!(status.model.as_deref(), Some("ChatGPTAPI"));
}

#[test]
fn session_success_without_data_is_parse_error() {
    let body = r#"{"status":"Success","message":"","data":null}"#;
    assert!(matches!(parse_session_response(200, body), Err(SessionError::Parse(_))));
}

#[test]
fn session_fail_is_rejected_with_message() {
    let body = r#"{"status":"Fail","message":"backend down","data":null}"#;
    assert_eq!(
        parse_session_response(200, body),
        Err(SessionError::Rejected("backend down".into()))
    );
}

#[test]
fn session_unauthorized_maps_to_unauthorized() {
    let body = r#"{"status":"Unauthorized","message":"","data":null}"#;
    assert_eq!(
        parse_session_response(200, body),
        Err(SessionError::Unauthorized("unauthorized".into()))
    );
}

#[test]
fn session_non_success_status_is_status_error() {
    assert_eq!(parse_session_response(502, "<html>"), Err(SessionError::Status { status: 502 }));
}

#[test]
fn session_garbage_body_is_parse_error() {
    assert!(matches!(parse_session_response(200, "not json"), Err(SessionError::Parse(_))));
}

// =============================================================================
// parse_verify_response
// =============================================================================

#[test]
fn verify_success_without_token_keeps_code() {
    let body = r#"{"status":"Success","message":"Verify successfully","data":null}"#;
    let result = parse_verify_response("abc", 200, body).unwrap();
    assert_eq!(result.token, "abc");
    assert_eq!(result.message.as_deref(), Some("Verify successfully"));
}

#[test]
fn verify_success_prefers_issued_token() {
    let body = r#"{"status":"Success","message":"","data":{"token":"issued-1"}}"#;
    let result = parse_verify_response("abc", 200, body).unwrap();
    assert_eq!(result.token, "issued-1");
    assert!(result.message.is_none());
}

#[test]
fn verify_fail_is_invalid_code() {
    let body = r#"{"status":"Fail","message":"Secret key is invalid","data":null}"#;
    assert_eq!(
        parse_verify_response("abc", 200, body),
        Err(SessionError::InvalidCode("Secret key is invalid".into()))
    );
}

#[test]
fn verify_fail_without_message_uses_fallback() {
    let body = r#"{"status":"Fail"}"#;
    assert_eq!(
        parse_verify_response("abc", 200, body),
        Err(SessionError::InvalidCode("invitation code rejected".into()))
    );
}

#[test]
fn verify_server_error_is_transport_kind() {
    let err = parse_verify_response("abc", 500, "").unwrap_err();
    assert!(err.is_transport());
}

// =============================================================================
// HttpSessionService against an in-process backend
// =============================================================================

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn backend() -> Router {
    Router::new()
        .route(
            "/api/session",
            post(|headers: HeaderMap| async move {
                // Echo the presented credential through the model field.
                Json(json!({
                    "status": "Success",
                    "message": "",
                    "data": { "auth": true, "model": bearer(&headers) }
                }))
            }),
        )
        .route(
            "/api/verify",
            post(|Json(body): Json<Value>| async move {
                if body["invitationCode"] == "open-sesame" {
                    Json(json!({ "status": "Success", "message": "Verify successfully", "data": null }))
                } else {
                    Json(json!({ "status": "Fail", "message": "Secret key is invalid", "data": null }))
                }
            }),
        )
}

#[tokio::test]
async fn http_fetch_session_decodes_envelope() {
    let base = spawn_backend(backend()).await;
    let service = HttpSessionService::new(base, Duration::from_secs(2)).unwrap();

    let status = service.fetch_session(None).await.unwrap();
    assert!(status.auth_required);
    assert!(status.model.is_none());
}

#[tokio::test]
async fn http_fetch_session_sends_bearer_token() {
    let base = spawn_backend(backend()).await;
    let service = HttpSessionService::new(base, Duration::from_secs(2)).unwrap();

    let status = service.fetch_session(Some("tok-1")).await.unwrap();
    assert_eq!(status.model.as_deref(), Some("Bearer tok-1"));
}

#[tokio::test]
async fn http_verify_accepts_valid_code() {
    let base = spawn_backend(backend()).await;
    let service = HttpSessionService::new(base, Duration::from_secs(2)).unwrap();

    let result = service.verify("open-sesame", None).await.unwrap();
    assert_eq!(result.token, "open-sesame");
}

#[tokio::test]
async fn http_verify_rejects_invalid_code() {
    let base = spawn_backend(backend()).await;
    let service = HttpSessionService::new(base, Duration::from_secs(2)).unwrap();

    let err = service.verify("guess", None).await.unwrap_err();
    assert_eq!(err, SessionError::InvalidCode("Secret key is invalid".into()));
}

#[tokio::test]
async fn http_error_status_maps_to_status_error() {
    let router = Router::new().route("/api/session", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let base = spawn_backend(router).await;
    let service = HttpSessionService::new(base, Duration::from_secs(2)).unwrap();

    let err = service.fetch_session(None).await.unwrap_err();
    assert_eq!(err, SessionError::Status { status: 500 });
}

#[tokio::test]
async fn http_unreachable_backend_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = HttpSessionService::new(format!("http://{addr}/api"), Duration::from_secs(2)).unwrap();
    let err = service.fetch_session(None).await.unwrap_err();
    assert!(matches!(err, SessionError::Transport(_)));
}
