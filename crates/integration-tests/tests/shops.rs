//! Shop listing, creation, and profile-edit authorization.

use axum::http::StatusCode;
use serde_json::json;

use kasilink_integration_tests::{ADMIN_TOKEN, TOKEN_A, TOKEN_B, TestApp, create_shop};

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let app = TestApp::new();

    let created = app
        .post(
            "/api/shops",
            Some(TOKEN_A),
            json!({
                "name": "Gogo's Sewing",
                "description": "Custom tailoring and alterations",
                "category": "tailor",
                "imageUrl": "https://example.com/gogos.jpg",
                "location": "Soweto",
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["ownerId"], "user-a");
    assert_eq!(created.body["status"], "active");
    assert!(created.body["id"].is_i64());
    assert!(created.body["createdAt"].is_string());

    let id = created.body["id"].as_i64().expect("id is an integer");
    let fetched = app.get(&format!("/api/shops/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["name"], "Gogo's Sewing");
    assert_eq!(fetched.body["description"], "Custom tailoring and alterations");
    assert_eq!(fetched.body["category"], "tailor");
    assert_eq!(fetched.body["imageUrl"], "https://example.com/gogos.jpg");
    assert_eq!(fetched.body["location"], "Soweto");
    assert_eq!(fetched.body, created.body);
}

#[tokio::test]
async fn test_anonymous_cannot_create_shop() {
    let app = TestApp::new();
    let response = app
        .post(
            "/api/shops",
            None,
            json!({
                "name": "No Auth",
                "description": "d",
                "category": "retail",
                "imageUrl": "https://example.com/x.jpg",
                "location": "here",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_rejects_blank_name() {
    let app = TestApp::new();
    let response = app
        .post(
            "/api/shops",
            Some(TOKEN_A),
            json!({
                "name": "   ",
                "description": "d",
                "category": "retail",
                "imageUrl": "https://example.com/x.jpg",
                "location": "here",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_category_filter() {
    let app = TestApp::new();
    app.post(
        "/api/shops",
        Some(TOKEN_A),
        json!({
            "name": "Tailor Shop",
            "description": "d",
            "category": "tailor",
            "imageUrl": "https://example.com/t.jpg",
            "location": "here",
        }),
    )
    .await;
    create_shop(&app, TOKEN_A, "Retail Shop").await;

    let all = app.get("/api/shops", None).await;
    assert_eq!(all.body.as_array().map(Vec::len), Some(2));

    let tailors = app.get("/api/shops?category=tailor", None).await;
    let tailors = tailors.body.as_array().expect("array body");
    assert_eq!(tailors.len(), 1);
    assert_eq!(tailors[0]["name"], "Tailor Shop");
}

#[tokio::test]
async fn test_get_missing_shop_is_404() {
    let app = TestApp::new();
    let response = app.get("/api/shops/999", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_edit_is_owner_only() {
    let app = TestApp::new();
    app.grant_admin("admin-1").await;
    let shop = create_shop(&app, TOKEN_A, "Owner Shop").await;
    let id = shop["id"].as_i64().expect("id is an integer");
    let uri = format!("/api/shops/{id}");

    // Owner may edit profile fields.
    let updated = app
        .patch(&uri, Some(TOKEN_A), json!({"location": "Khayelitsha"}))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["location"], "Khayelitsha");
    assert_eq!(updated.body["name"], "Owner Shop");

    // Another user may not.
    let forbidden = app
        .patch(&uri, Some(TOKEN_B), json!({"name": "Stolen"}))
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    // Neither may an admin: moderation and profile editing are separate.
    let admin_edit = app
        .patch(&uri, Some(ADMIN_TOKEN), json!({"name": "Moderated"}))
        .await;
    assert_eq!(admin_edit.status, StatusCode::FORBIDDEN);

    // Anonymous is 401, not 403.
    let anonymous = app.patch(&uri, None, json!({"name": "Ghost"})).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_edit_missing_shop_is_404() {
    let app = TestApp::new();
    let response = app
        .patch("/api/shops/999", Some(TOKEN_A), json!({"name": "Nope"}))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
