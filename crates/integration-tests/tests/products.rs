//! Product management authorization and validation.

use axum::http::StatusCode;
use serde_json::json;

use kasilink_integration_tests::{
    ADMIN_TOKEN, TOKEN_A, TOKEN_B, TestApp, create_product, create_shop,
};

#[tokio::test]
async fn test_owner_adds_product() {
    let app = TestApp::new();
    let shop = create_shop(&app, TOKEN_A, "Shop").await;
    let shop_id = shop["id"].as_i64().expect("id is an integer");

    let created = app
        .post(
            &format!("/api/shops/{shop_id}/products"),
            Some(TOKEN_A),
            json!({
                "name": "Wash & fold",
                "description": "Per bag",
                "price": "80",
                "imageUrl": "https://example.com/wash.jpg",
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["shopId"], shop_id);
    assert_eq!(created.body["price"], "80");
    // inStock defaults to true when omitted.
    assert_eq!(created.body["inStock"], true);

    let listed = app
        .get(&format!("/api/shops/{shop_id}/products"), None)
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_only_owner_or_admin_adds_products() {
    let app = TestApp::new();
    let shop = create_shop(&app, TOKEN_A, "Shop").await;
    let shop_id = shop["id"].as_i64().expect("id is an integer");
    let uri = format!("/api/shops/{shop_id}/products");
    let body = json!({
        "name": "P",
        "description": "d",
        "price": "10",
        "imageUrl": "https://example.com/p.jpg",
    });

    let stranger = app.post(&uri, Some(TOKEN_B), body.clone()).await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);

    let anonymous = app.post(&uri, None, body.clone()).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    app.grant_admin("admin-1").await;
    let admin = app.post(&uri, Some(ADMIN_TOKEN), body).await;
    assert_eq!(admin.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_price_must_be_positive() {
    let app = TestApp::new();
    let shop = create_shop(&app, TOKEN_A, "Shop").await;
    let shop_id = shop["id"].as_i64().expect("id is an integer");
    let uri = format!("/api/shops/{shop_id}/products");

    for price in ["0", "-5"] {
        let response = app
            .post(
                &uri,
                Some(TOKEN_A),
                json!({
                    "name": "P",
                    "description": "d",
                    "price": price,
                    "imageUrl": "https://example.com/p.jpg",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "price {price}");
    }
}

#[tokio::test]
async fn test_update_requires_shop_edit_rights() {
    let app = TestApp::new();
    app.grant_admin("admin-1").await;
    let shop = create_shop(&app, TOKEN_A, "Shop").await;
    let shop_id = shop["id"].as_i64().expect("id is an integer");
    let product = create_product(&app, TOKEN_A, shop_id, "Original").await;
    let uri = format!("/api/products/{}", product["id"]);

    let stranger = app
        .patch(&uri, Some(TOKEN_B), json!({"name": "Hijacked"}))
        .await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);

    let owner = app
        .patch(&uri, Some(TOKEN_A), json!({"price": "120.50", "inStock": false}))
        .await;
    assert_eq!(owner.status, StatusCode::OK);
    assert_eq!(owner.body["price"], "120.50");
    assert_eq!(owner.body["inStock"], false);
    assert_eq!(owner.body["name"], "Original");

    let admin = app
        .patch(&uri, Some(ADMIN_TOKEN), json!({"name": "Renamed"}))
        .await;
    assert_eq!(admin.status, StatusCode::OK);
    assert_eq!(admin.body["name"], "Renamed");
}

#[tokio::test]
async fn test_delete_product() {
    let app = TestApp::new();
    let shop = create_shop(&app, TOKEN_A, "Shop").await;
    let shop_id = shop["id"].as_i64().expect("id is an integer");
    let product = create_product(&app, TOKEN_A, shop_id, "Doomed").await;
    let uri = format!("/api/products/{}", product["id"]);

    let stranger = app.delete(&uri, Some(TOKEN_B)).await;
    assert_eq!(stranger.status, StatusCode::FORBIDDEN);

    let deleted = app.delete(&uri, Some(TOKEN_A)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["success"], true);

    let listed = app
        .get(&format!("/api/shops/{shop_id}/products"), None)
        .await;
    assert_eq!(listed.body.as_array().map(Vec::len), Some(0));

    let again = app.delete(&uri, Some(TOKEN_A)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_products_of_missing_shop_is_404() {
    let app = TestApp::new();
    let response = app.get("/api/shops/999/products", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
