//! Aggregate views for the admin and shop-owner surfaces.

use serde::{Deserialize, Serialize};

use super::{Order, Shop};

/// Platform-wide counters for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: i64,
    pub total_shops: i64,
    pub active_shops: i64,
    pub total_products: i64,
    pub total_orders: i64,
    pub pending_transport_orders: i64,
    pub total_tasks: i64,
    pub open_tasks: i64,
}

/// Per-shop roll-up for the shop-owner dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopDashboard {
    pub shop: Shop,
    pub products_count: i64,
    pub orders_count: i64,
    /// The five most recent orders, newest first.
    pub recent_orders: Vec<Order>,
}
