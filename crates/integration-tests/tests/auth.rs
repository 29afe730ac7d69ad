//! Identity resolution and the error envelope.

use axum::http::StatusCode;
use serde_json::json;

use kasilink_integration_tests::{TOKEN_A, TestApp};

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let live = app.get("/health", None).await;
    assert_eq!(live.status, StatusCode::OK);

    let ready = app.get("/health/ready", None).await;
    assert_eq!(ready.status, StatusCode::OK);
}

#[tokio::test]
async fn test_current_user_resolves_profile() {
    let app = TestApp::new();

    let profile = app.get("/api/auth/user", Some(TOKEN_A)).await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["id"], "user-a");
    assert_eq!(profile.body["email"], "a@example.com");
    assert_eq!(profile.body["firstName"], "Amahle");
    assert_eq!(profile.body["role"], "customer");
    assert!(profile.body["createdAt"].is_string());

    // The upsert is idempotent: same row on re-login.
    let again = app.get("/api/auth/user", Some(TOKEN_A)).await;
    assert_eq!(again.body["id"], "user-a");
    assert_eq!(again.body["createdAt"], profile.body["createdAt"]);
}

#[tokio::test]
async fn test_token_rejection() {
    let app = TestApp::new();

    let missing = app.get("/api/auth/user", None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let forged = app.get("/api/auth/user", Some("forged-token")).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    assert!(!forged.message().is_empty());
}

#[tokio::test]
async fn test_provider_failure_is_internal_not_unauthorized() {
    let app = TestApp::with_broken_provider();

    // The token may well be fine; a broken provider must not tell the
    // caller otherwise. Detail stays server-side.
    let outage = app.get("/api/auth/user", Some(TOKEN_A)).await;
    assert_eq!(outage.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(outage.message(), "Internal server error");

    // A missing credential is still the caller's problem.
    let missing = app.get("/api/auth/user", None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_request_id_on_every_response() {
    let app = TestApp::new();

    let generated = app.get("/health", None).await;
    assert_eq!(generated.status, StatusCode::OK);
    let id = generated
        .headers
        .get("x-request-id")
        .expect("request id header present");
    assert!(!id.is_empty());

    // An upstream-supplied id is echoed back unchanged.
    let echoed = app.get_traced("/health", "proxy-id-42").await;
    assert_eq!(
        echoed.headers.get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("proxy-id-42")
    );
}

#[tokio::test]
async fn test_error_envelope_shape() {
    let app = TestApp::new();

    // Every error body is {"message": ...}.
    let not_found = app.get("/api/shops/999", None).await;
    assert_eq!(not_found.status, StatusCode::NOT_FOUND);
    assert!(not_found.body["message"].is_string());

    let malformed = app
        .post("/api/shops", Some(TOKEN_A), json!({"name": 42}))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert!(malformed.body["message"].is_string());
}
