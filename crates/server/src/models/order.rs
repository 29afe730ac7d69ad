//! Order model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kasilink_core::{OrderId, OrderStatus, ProductId, ShopId, UserId};

/// A customer order against one shop/product pair.
///
/// The transporter is recorded when a transport request is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_id: UserId,
    pub shop_id: ShopId,
    pub product_id: ProductId,
    pub status: OrderStatus,
    pub transport_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Fields for placing an order. The customer is always the authenticated
/// caller; the initial status is `pending` or `transport_requested`.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: UserId,
    pub shop_id: ShopId,
    pub product_id: ProductId,
    pub status: OrderStatus,
}
