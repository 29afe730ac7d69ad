//! Admin moderation and platform-wide reads.
//!
//! Every handler runs the same `AdminRead`/moderation policy check; there
//! is no separate admin router layer, so a non-admin gets a uniform 403.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use serde::Deserialize;

use kasilink_core::{Action, Role, ShopId, ShopStatus, UserId, authorize};

use crate::error::{AppError, AppJson, Result};
use crate::middleware::RequireAuth;
use crate::models::{AdminStats, Order, Shop, User};
use crate::state::AppState;

/// Build the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/stats", get(stats))
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/shops", get(list_shops))
        .route("/api/admin/orders", get(list_orders))
        .route("/api/admin/shops/{id}/status", patch(moderate_shop))
        .route("/api/admin/users/{id}/role", patch(change_user_role))
}

/// Platform-wide counters.
async fn stats(State(state): State<AppState>, auth: RequireAuth) -> Result<Json<AdminStats>> {
    authorize(Some(&auth.actor()), &Action::AdminRead)?;
    let stats = state.storage().admin_stats().await?;
    Ok(Json(stats))
}

/// All registered users.
async fn list_users(State(state): State<AppState>, auth: RequireAuth) -> Result<Json<Vec<User>>> {
    authorize(Some(&auth.actor()), &Action::AdminRead)?;
    let users = state.storage().list_users().await?;
    Ok(Json(users))
}

/// All shops, including suspended ones.
async fn list_shops(State(state): State<AppState>, auth: RequireAuth) -> Result<Json<Vec<Shop>>> {
    authorize(Some(&auth.actor()), &Action::AdminRead)?;
    let shops = state.storage().list_shops(None).await?;
    Ok(Json(shops))
}

/// All orders across the platform.
async fn list_orders(State(state): State<AppState>, auth: RequireAuth) -> Result<Json<Vec<Order>>> {
    authorize(Some(&auth.actor()), &Action::AdminRead)?;
    let orders = state.storage().list_orders().await?;
    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
struct ModerateShopRequest {
    status: ShopStatus,
}

/// Suspend or reactivate a shop.
async fn moderate_shop(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<i32>,
    AppJson(body): AppJson<ModerateShopRequest>,
) -> Result<Json<Shop>> {
    authorize(Some(&auth.actor()), &Action::ModerateShop)?;

    let shop = state
        .storage()
        .update_shop_status(ShopId::new(id), body.status)
        .await?
        .ok_or(AppError::NotFound("Shop"))?;
    Ok(Json(shop))
}

#[derive(Debug, Deserialize)]
struct ChangeRoleRequest {
    role: Role,
}

/// Change another user's platform role.
async fn change_user_role(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<String>,
    AppJson(body): AppJson<ChangeRoleRequest>,
) -> Result<Json<User>> {
    authorize(Some(&auth.actor()), &Action::ChangeUserRole)?;

    let user = state
        .storage()
        .update_user_role(&UserId::from(id), body.role)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(Json(user))
}
