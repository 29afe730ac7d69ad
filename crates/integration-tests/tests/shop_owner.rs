//! Shop-owner dashboard roll-up.

use axum::http::StatusCode;
use serde_json::json;

use kasilink_integration_tests::{TOKEN_A, TOKEN_B, TestApp, create_product, create_shop};

#[tokio::test]
async fn test_dashboard_rolls_up_owned_shops() {
    let app = TestApp::new();
    let shop = create_shop(&app, TOKEN_A, "Shop").await;
    let shop_id = shop["id"].as_i64().expect("id is an integer");
    let product = create_product(&app, TOKEN_A, shop_id, "Product").await;

    for _ in 0..2 {
        let order = app
            .post(
                "/api/orders",
                Some(TOKEN_B),
                json!({"shopId": shop_id, "productId": product["id"]}),
            )
            .await;
        assert_eq!(order.status, StatusCode::CREATED);
    }

    let dashboard = app.get("/api/shop-owner/dashboard", Some(TOKEN_A)).await;
    assert_eq!(dashboard.status, StatusCode::OK);
    let entries = dashboard.body.as_array().expect("array body");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["shop"]["id"], shop_id);
    assert_eq!(entries[0]["productsCount"], 1);
    assert_eq!(entries[0]["ordersCount"], 2);
    assert_eq!(
        entries[0]["recentOrders"].as_array().map(Vec::len),
        Some(2)
    );

    // A user with no shops gets an empty dashboard, not an error.
    let empty = app.get("/api/shop-owner/dashboard", Some(TOKEN_B)).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body.as_array().map(Vec::len), Some(0));

    let anonymous = app.get("/api/shop-owner/dashboard", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}
