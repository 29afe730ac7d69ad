//! Product catalogue endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kasilink_core::{Action, ProductId, ShopId, UserId, authorize};

use crate::error::{AppError, AppJson, Result};
use crate::middleware::RequireAuth;
use crate::models::{NewProduct, Product, ProductUpdate};
use crate::routes::validate;
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/shops/{shop_id}/products",
            get(list_products).post(create_product),
        )
        .route(
            "/api/products/{id}",
            patch(update_product).delete(delete_product),
        )
}

/// List all products of a shop. Public.
async fn list_products(
    State(state): State<AppState>,
    Path(shop_id): Path<i32>,
) -> Result<Json<Vec<Product>>> {
    let shop_id = ShopId::new(shop_id);
    state
        .storage()
        .get_shop(shop_id)
        .await?
        .ok_or(AppError::NotFound("Shop"))?;
    let products = state.storage().list_products_by_shop(shop_id).await?;
    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProductRequest {
    name: String,
    description: String,
    price: Decimal,
    image_url: String,
    #[serde(default = "default_in_stock")]
    in_stock: bool,
}

const fn default_in_stock() -> bool {
    true
}

/// Add a product to a shop the caller owns.
async fn create_product(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(shop_id): Path<i32>,
    AppJson(body): AppJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let shop_id = ShopId::new(shop_id);
    let shop = state
        .storage()
        .get_shop(shop_id)
        .await?
        .ok_or(AppError::NotFound("Shop"))?;

    authorize(
        Some(&auth.actor()),
        &Action::ManageProduct {
            shop_owner_id: &shop.owner_id,
        },
    )?;

    validate::non_empty("name", &body.name)?;
    validate::non_empty("description", &body.description)?;
    validate::valid_url("imageUrl", &body.image_url)?;
    let price = validate::positive_amount("price", body.price)?;

    let product = state
        .storage()
        .create_product(NewProduct {
            shop_id,
            name: body.name,
            description: body.description,
            price,
            image_url: body.image_url,
            in_stock: body.in_stock,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UpdateProductRequest {
    name: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    image_url: Option<String>,
    in_stock: Option<bool>,
}

/// Edit a product. Owner of the parent shop, or admin.
async fn update_product(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<i32>,
    AppJson(body): AppJson<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    let shop_owner_id = product_shop_owner(&state, id).await?;

    authorize(
        Some(&auth.actor()),
        &Action::ManageProduct {
            shop_owner_id: &shop_owner_id,
        },
    )?;

    if let Some(name) = &body.name {
        validate::non_empty("name", name)?;
    }
    if let Some(description) = &body.description {
        validate::non_empty("description", description)?;
    }
    if let Some(image_url) = &body.image_url {
        validate::valid_url("imageUrl", image_url)?;
    }
    let price = body
        .price
        .map(|p| validate::positive_amount("price", p))
        .transpose()?;

    let updated = state
        .storage()
        .update_product(
            id,
            ProductUpdate {
                name: body.name,
                description: body.description,
                price,
                image_url: body.image_url,
                in_stock: body.in_stock,
            },
        )
        .await?
        .ok_or(AppError::NotFound("Product"))?;

    Ok(Json(updated))
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    success: bool,
}

/// Delete a product. Owner of the parent shop, or admin.
async fn delete_product(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<DeleteResponse>> {
    let id = ProductId::new(id);
    let shop_owner_id = product_shop_owner(&state, id).await?;

    authorize(
        Some(&auth.actor()),
        &Action::ManageProduct {
            shop_owner_id: &shop_owner_id,
        },
    )?;

    if !state.storage().delete_product(id).await? {
        return Err(AppError::NotFound("Product"));
    }
    Ok(Json(DeleteResponse { success: true }))
}

/// Resolve the owner of the shop a product belongs to.
async fn product_shop_owner(state: &AppState, id: ProductId) -> Result<UserId> {
    let product = state
        .storage()
        .get_product(id)
        .await?
        .ok_or(AppError::NotFound("Product"))?;
    let shop = state
        .storage()
        .get_shop(product.shop_id)
        .await?
        .ok_or(AppError::NotFound("Shop"))?;
    Ok(shop.owner_id)
}
