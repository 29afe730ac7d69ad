//! Order placement and lifecycle endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Deserialize;

use kasilink_core::{Action, OrderId, OrderStatus, ProductId, ShopId, authorize, order_transition};

use crate::error::{AppError, AppJson, Result};
use crate::middleware::RequireAuth;
use crate::models::{NewOrder, Order};
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(create_order))
        .route("/api/orders/my", get(my_orders))
        .route("/api/orders/pending-transport", get(pending_transport))
        .route("/api/orders/{id}/status", patch(update_order_status))
        .route("/api/shops/{shop_id}/orders", get(shop_orders))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderRequest {
    shop_id: ShopId,
    product_id: ProductId,
    status: Option<OrderStatus>,
}

/// Place an order for a product. The customer is always the caller; the
/// initial status may be `pending` (default) or `transport_requested`.
async fn create_order(
    State(state): State<AppState>,
    auth: RequireAuth,
    AppJson(body): AppJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    authorize(Some(&auth.actor()), &Action::CreateOrder)?;

    let status = body.status.unwrap_or_default();
    if !status.is_initial() {
        return Err(AppError::Validation(format!(
            "orders cannot start in status {status:?}"
        )));
    }

    let shop = state
        .storage()
        .get_shop(body.shop_id)
        .await?
        .ok_or(AppError::NotFound("Shop"))?;
    let product = state
        .storage()
        .get_product(body.product_id)
        .await?
        .ok_or(AppError::NotFound("Product"))?;
    if product.shop_id != shop.id {
        return Err(AppError::Validation(
            "product does not belong to the given shop".to_owned(),
        ));
    }

    let order = state
        .storage()
        .create_order(NewOrder {
            customer_id: auth.user_id().clone(),
            shop_id: shop.id,
            product_id: product.id,
            status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// List the caller's own orders.
async fn my_orders(State(state): State<AppState>, auth: RequireAuth) -> Result<Json<Vec<Order>>> {
    let orders = state
        .storage()
        .list_orders_by_customer(auth.user_id())
        .await?;
    Ok(Json(orders))
}

/// List orders awaiting a transporter. Any authenticated user may browse
/// these, since anyone may accept one.
async fn pending_transport(
    State(state): State<AppState>,
    _auth: RequireAuth,
) -> Result<Json<Vec<Order>>> {
    let orders = state.storage().list_pending_transport_orders().await?;
    Ok(Json(orders))
}

/// List the orders placed against a shop. Owner or admin.
async fn shop_orders(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(shop_id): Path<i32>,
) -> Result<Json<Vec<Order>>> {
    let shop_id = ShopId::new(shop_id);
    let shop = state
        .storage()
        .get_shop(shop_id)
        .await?
        .ok_or(AppError::NotFound("Shop"))?;

    authorize(
        Some(&auth.actor()),
        &Action::ViewShopOrders {
            owner_id: &shop.owner_id,
        },
    )?;

    let orders = state.storage().list_orders_by_shop(shop_id).await?;
    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
struct UpdateOrderStatusRequest {
    status: OrderStatus,
}

/// Advance an order along its lifecycle chain.
///
/// The transition is computed before authorization so an impossible move
/// yields 409 regardless of who asks. The status-guarded write then
/// catches concurrent movers.
async fn update_order_status(
    State(state): State<AppState>,
    auth: RequireAuth,
    Path(id): Path<i32>,
    AppJson(body): AppJson<UpdateOrderStatusRequest>,
) -> Result<Json<Order>> {
    let id = OrderId::new(id);
    let order = state
        .storage()
        .get_order(id)
        .await?
        .ok_or(AppError::NotFound("Order"))?;
    let shop = state
        .storage()
        .get_shop(order.shop_id)
        .await?
        .ok_or(AppError::NotFound("Shop"))?;

    let transition = order_transition(order.status, body.status, auth.user_id())?;

    let action = match transition.status {
        OrderStatus::TransportRequested => Action::RequestTransport {
            customer_id: &order.customer_id,
        },
        OrderStatus::PickedUp => Action::AcceptTransport,
        OrderStatus::Delivered => Action::MarkDelivered {
            shop_owner_id: &shop.owner_id,
            transport_id: order.transport_id.as_ref(),
        },
        // the lifecycle never yields Pending as a target
        OrderStatus::Pending | OrderStatus::Completed => Action::MarkCompleted {
            customer_id: &order.customer_id,
            shop_owner_id: &shop.owner_id,
        },
    };
    authorize(Some(&auth.actor()), &action)?;

    let updated = state
        .storage()
        .apply_order_transition(id, order.status, &transition)
        .await?
        .ok_or(AppError::NotFound("Order"))?;

    Ok(Json(updated))
}
