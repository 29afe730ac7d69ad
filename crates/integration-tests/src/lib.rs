//! Integration tests for KasiLink.
//!
//! Tests drive the full router in-process over the in-memory storage
//! backend and a static token table, so no database or identity provider
//! is needed. Each [`TestApp`] is fully isolated.
//!
//! Run with: `cargo test -p kasilink-integration-tests`

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use kasilink_core::{Email, Role, UserId};
use kasilink_server::db::{MemoryStorage, Storage};
use kasilink_server::models::NewUser;
use kasilink_server::services::identity::{
    AuthError, IdentityVerifier, StaticVerifier, VerifiedIdentity,
};
use kasilink_server::state::AppState;

/// Bearer token verifying to subject `user-a`.
pub const TOKEN_A: &str = "token-a";
/// Bearer token verifying to subject `user-b`.
pub const TOKEN_B: &str = "token-b";
/// Bearer token verifying to subject `user-c`.
pub const TOKEN_C: &str = "token-c";
/// Bearer token verifying to subject `admin-1` (promote via
/// [`TestApp::grant_admin`]).
pub const ADMIN_TOKEN: &str = "admin-token";

/// An in-process instance of the full application.
pub struct TestApp {
    router: Router,
    storage: Arc<MemoryStorage>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Build an app over fresh in-memory storage with the fixed test
    /// token table.
    #[must_use]
    pub fn new() -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let verifier = StaticVerifier::new()
            .with_token(TOKEN_A, identity("user-a", "a@example.com", "Amahle", "Dube"))
            .with_token(TOKEN_B, identity("user-b", "b@example.com", "Bongani", "Khoza"))
            .with_token(TOKEN_C, identity("user-c", "c@example.com", "Carol", "Nkosi"))
            .with_token(
                ADMIN_TOKEN,
                identity("admin-1", "admin@example.com", "Ayanda", "Mthembu"),
            );
        let state = AppState::new(storage.clone(), Arc::new(verifier));
        Self {
            router: kasilink_server::app(state),
            storage,
        }
    }

    /// Build an app whose identity provider is broken: every verification
    /// fails with a non-credential error, as when the userinfo endpoint is
    /// unreachable.
    #[must_use]
    pub fn with_broken_provider() -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let state = AppState::new(storage.clone(), Arc::new(BrokenVerifier));
        Self {
            router: kasilink_server::app(state),
            storage,
        }
    }

    /// Promote a subject to admin directly in storage.
    ///
    /// Verification never changes roles, so promoting before the first
    /// request and letting the auth upsert run afterwards is the same
    /// flow a real deployment uses.
    pub async fn grant_admin(&self, subject: &str) {
        let user = self
            .storage
            .upsert_user(NewUser {
                id: UserId::from(subject),
                email: Email::parse(&format!("{subject}@example.com")).expect("valid email"),
                first_name: "Test".to_owned(),
                last_name: "Admin".to_owned(),
                profile_image_url: None,
            })
            .await
            .expect("upsert succeeds");
        self.storage
            .update_user_role(&user.id, Role::Admin)
            .await
            .expect("role update succeeds")
            .expect("user exists");
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    /// GET carrying an upstream `x-request-id` header.
    pub async fn get_traced(&self, uri: &str, request_id: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header("x-request-id", request_id)
            .body(Body::empty())
            .expect("valid request");
        self.dispatch(request).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, token, None).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&json).expect("body serializes"),
                )),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Verifier that fails the way a dead userinfo endpoint does, without the
/// token itself being at fault.
struct BrokenVerifier;

#[async_trait::async_trait]
impl IdentityVerifier for BrokenVerifier {
    async fn verify(&self, _token: &str) -> Result<VerifiedIdentity, AuthError> {
        Err(AuthError::InvalidClaims(
            "userinfo response had no usable claims".to_owned(),
        ))
    }
}

/// A collected response: status, response headers, and parsed JSON body
/// (null for non-JSON bodies).
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The `message` field of an error body.
    #[must_use]
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

fn identity(subject: &str, email: &str, first: &str, last: &str) -> VerifiedIdentity {
    VerifiedIdentity {
        subject: UserId::from(subject),
        email: Email::parse(email).expect("valid email"),
        first_name: first.to_owned(),
        last_name: last.to_owned(),
        profile_image_url: None,
    }
}

/// Create a shop as `token` and return its JSON. Panics on failure.
pub async fn create_shop(app: &TestApp, token: &str, name: &str) -> Value {
    let response = app
        .post(
            "/api/shops",
            Some(token),
            serde_json::json!({
                "name": name,
                "description": "A test shop",
                "category": "retail",
                "imageUrl": "https://example.com/shop.jpg",
                "location": "Soweto",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.message());
    response.body
}

/// Add a product to `shop_id` as `token` and return its JSON.
pub async fn create_product(app: &TestApp, token: &str, shop_id: i64, name: &str) -> Value {
    let response = app
        .post(
            &format!("/api/shops/{shop_id}/products"),
            Some(token),
            serde_json::json!({
                "name": name,
                "description": "A test product",
                "price": "99.99",
                "imageUrl": "https://example.com/product.jpg",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.message());
    response.body
}
