//! Status and category enums for marketplace entities.
//!
//! All variants serialize in `snake_case` to match the wire format, and map
//! to `PostgreSQL` enum types of the same name when the `postgres` feature
//! is enabled.

use serde::{Deserialize, Serialize};

/// The kind of business a shop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop_category", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ShopCategory {
    Tailor,
    Laundry,
    Retail,
    Service,
}

/// Moderation status of a shop.
///
/// Suspension does not cascade to the shop's products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ShopStatus {
    #[default]
    Active,
    Suspended,
}

/// Lifecycle status of a community task.
///
/// Transitions are governed by [`crate::lifecycle::task_transition`]:
/// `Open` is initial, `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "task_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Open,
    InProgress,
    Completed,
}

/// Lifecycle status of an order.
///
/// An order is created at `Pending`, or directly at `TransportRequested`
/// when the customer asks for third-party delivery. Transitions are governed
/// by [`crate::lifecycle::order_transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    TransportRequested,
    PickedUp,
    Delivered,
    Completed,
}

impl OrderStatus {
    /// Whether an order may be created directly in this status.
    #[must_use]
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::Pending | Self::TransportRequested)
    }
}
