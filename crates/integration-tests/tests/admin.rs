//! Admin surface: stats, moderation, and role changes.

use axum::http::StatusCode;
use serde_json::json;

use kasilink_integration_tests::{
    ADMIN_TOKEN, TOKEN_A, TOKEN_B, TestApp, create_product, create_shop,
};

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let app = TestApp::new();

    for uri in [
        "/api/admin/stats",
        "/api/admin/users",
        "/api/admin/shops",
        "/api/admin/orders",
    ] {
        let anonymous = app.get(uri, None).await;
        assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED, "{uri}");

        let customer = app.get(uri, Some(TOKEN_A)).await;
        assert_eq!(customer.status, StatusCode::FORBIDDEN, "{uri}");
    }

    // ADMIN_TOKEN without the stored role is still just a customer.
    let unpromoted = app.get("/api/admin/stats", Some(ADMIN_TOKEN)).await;
    assert_eq!(unpromoted.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_stats_counts() {
    let app = TestApp::new();
    app.grant_admin("admin-1").await;

    let shop = create_shop(&app, TOKEN_A, "Shop").await;
    let shop_id = shop["id"].as_i64().expect("id is an integer");
    let product = create_product(&app, TOKEN_A, shop_id, "Product").await;
    app.post(
        "/api/orders",
        Some(TOKEN_B),
        json!({
            "shopId": shop_id,
            "productId": product["id"],
            "status": "transport_requested",
        }),
    )
    .await;
    app.post(
        "/api/tasks",
        Some(TOKEN_B),
        json!({
            "title": "T",
            "description": "d",
            "budget": "50",
            "location": "here",
        }),
    )
    .await;

    let stats = app.get("/api/admin/stats", Some(ADMIN_TOKEN)).await;
    assert_eq!(stats.status, StatusCode::OK);
    // user-a, user-b, and the admin have all been upserted by now.
    assert_eq!(stats.body["totalUsers"], 3);
    assert_eq!(stats.body["totalShops"], 1);
    assert_eq!(stats.body["activeShops"], 1);
    assert_eq!(stats.body["totalProducts"], 1);
    assert_eq!(stats.body["totalOrders"], 1);
    assert_eq!(stats.body["pendingTransportOrders"], 1);
    assert_eq!(stats.body["totalTasks"], 1);
    assert_eq!(stats.body["openTasks"], 1);
}

#[tokio::test]
async fn test_shop_moderation() {
    let app = TestApp::new();
    app.grant_admin("admin-1").await;
    let shop = create_shop(&app, TOKEN_A, "Shop").await;
    let uri = format!("/api/admin/shops/{}/status", shop["id"]);

    // Owners cannot moderate their own shop.
    let by_owner = app
        .patch(&uri, Some(TOKEN_A), json!({"status": "suspended"}))
        .await;
    assert_eq!(by_owner.status, StatusCode::FORBIDDEN);

    let suspended = app
        .patch(&uri, Some(ADMIN_TOKEN), json!({"status": "suspended"}))
        .await;
    assert_eq!(suspended.status, StatusCode::OK);
    assert_eq!(suspended.body["status"], "suspended");

    // Suspension does not delete: the shop remains readable.
    let fetched = app.get(&format!("/api/shops/{}", shop["id"]), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["status"], "suspended");

    let missing = app
        .patch("/api/admin/shops/999/status", Some(ADMIN_TOKEN), json!({"status": "active"}))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_role_change_persists_across_logins() {
    let app = TestApp::new();
    app.grant_admin("admin-1").await;

    // user-b registers a profile by making an authenticated request.
    app.get("/api/auth/user", Some(TOKEN_B)).await;

    let changed = app
        .patch(
            "/api/admin/users/user-b/role",
            Some(ADMIN_TOKEN),
            json!({"role": "shop_owner"}),
        )
        .await;
    assert_eq!(changed.status, StatusCode::OK);
    assert_eq!(changed.body["role"], "shop_owner");

    // A subsequent verification upsert must not reset the role.
    let profile = app.get("/api/auth/user", Some(TOKEN_B)).await;
    assert_eq!(profile.body["role"], "shop_owner");

    let missing = app
        .patch(
            "/api/admin/users/nobody/role",
            Some(ADMIN_TOKEN),
            json!({"role": "admin"}),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_listings() {
    let app = TestApp::new();
    app.grant_admin("admin-1").await;
    create_shop(&app, TOKEN_A, "Shop").await;

    let users = app.get("/api/admin/users", Some(ADMIN_TOKEN)).await;
    assert_eq!(users.status, StatusCode::OK);
    assert!(users.body.as_array().is_some_and(|u| !u.is_empty()));

    let shops = app.get("/api/admin/shops", Some(ADMIN_TOKEN)).await;
    assert_eq!(shops.body.as_array().map(Vec::len), Some(1));

    let orders = app.get("/api/admin/orders", Some(ADMIN_TOKEN)).await;
    assert_eq!(orders.body.as_array().map(Vec::len), Some(0));
}
