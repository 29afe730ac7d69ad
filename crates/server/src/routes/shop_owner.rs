//! Shop-owner dashboard.

use axum::{Json, Router, extract::State, routing::get};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::ShopDashboard;
use crate::state::AppState;

/// Build the shop-owner router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/shop-owner/dashboard", get(dashboard))
}

/// Roll up every shop the caller owns: product count, order count, and
/// the most recent orders. A caller with no shops gets an empty array.
async fn dashboard(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<Vec<ShopDashboard>>> {
    let shops = state.storage().list_shops_by_owner(auth.user_id()).await?;

    let mut dashboards = Vec::with_capacity(shops.len());
    for shop in shops {
        let products = state.storage().list_products_by_shop(shop.id).await?;
        let orders = state.storage().list_orders_by_shop(shop.id).await?;
        let recent_orders = orders.iter().rev().take(5).cloned().collect();
        dashboards.push(ShopDashboard {
            products_count: products.len() as i64,
            orders_count: orders.len() as i64,
            recent_orders,
            shop,
        });
    }

    Ok(Json(dashboards))
}
