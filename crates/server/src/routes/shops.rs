//! Shop listing, creation, and profile editing.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use kasilink_core::{Action, ShopCategory, ShopId, authorize};

use crate::error::{AppError, AppJson, Result};
use crate::middleware::RequireAuth;
use crate::models::{NewShop, Shop, ShopUpdate};
use crate::routes::validate;
use crate::state::AppState;

/// Build the shops router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/shops", get(list_shops).post(create_shop))
        .route("/api/shops/{id}", get(get_shop).patch(update_shop))
}

#[derive(Debug, Deserialize)]
struct ShopsQuery {
    category: Option<ShopCategory>,
}

/// List shops, optionally filtered by category. Public.
async fn list_shops(
    State(state): State<AppState>,
    Query(query): Query<ShopsQuery>,
) -> Result<Json<Vec<Shop>>> {
    let shops = state.storage().list_shops(query.category).await?;
    Ok(Json(shops))
}

/// Fetch a single shop. Public.
async fn get_shop(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Shop>> {
    let shop = state
        .storage()
        .get_shop(ShopId::new(id))
        .await?
        .ok_or(AppError::NotFound("Shop"))?;
    Ok(Json(shop))
}

/// Request body for creating a shop.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateShopRequest {
    name: String,
    description: String,
    category: ShopCategory,
    image_url: String,
    location: String,
}

/// Create a shop owned by the caller.
async fn create_shop(
    State(state): State<AppState>,
    auth: RequireAuth,
    AppJson(body): AppJson<CreateShopRequest>,
) -> Result<(StatusCode, Json<Shop>)> {
    authorize(Some(&auth.actor()), &Action::CreateShop)?;

    validate::non_empty("name", &body.name)?;
    validate::non_empty("description", &body.description)?;
    validate::valid_url("imageUrl", &body.image_url)?;
    validate::non_empty("location", &body.location)?;

    let shop = state
        .storage()
        .create_shop(NewShop {
            owner_id: auth.user_id().clone(),
            name: body.name,
            description: body.description,
            category: body.category,
            image_url: body.image_url,
            location: body.location,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(shop)))
}

/// Request body for editing a shop's profile fields.
///
/// Moderation status is deliberately not editable here.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UpdateShopRequest {
    name: Option<String>,
    description: Option<String>,
    category: Option<ShopCategory>,
    image_url: Option<String>,
    location: Option<String>,
}

/// Edit a shop's profile. Owner only.
async fn update_shop(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<i32>,
    AppJson(body): AppJson<UpdateShopRequest>,
) -> Result<Json<Shop>> {
    let id = ShopId::new(id);
    let shop = state
        .storage()
        .get_shop(id)
        .await?
        .ok_or(AppError::NotFound("Shop"))?;

    authorize(
        Some(&auth.actor()),
        &Action::UpdateShopProfile {
            owner_id: &shop.owner_id,
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
    if let Some(location) = &body.location {
        validate::non_empty("location", location)?;
    }

    let updated = state
        .storage()
        .update_shop(
            id,
            ShopUpdate {
                name: body.name,
                description: body.description,
                category: body.category,
                image_url: body.image_url,
                location: body.location,
            },
        )
        .await?
        .ok_or(AppError::NotFound("Shop"))?;

    Ok(Json(updated))
}
