//! Shop model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kasilink_core::{ShopCategory, ShopId, ShopStatus, UserId};

/// A shop listed on the marketplace.
///
/// Shops are never hard-deleted; moderation suspends them instead, which
/// does not cascade to their products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: ShopId,
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub category: ShopCategory,
    pub image_url: String,
    pub location: String,
    pub status: ShopStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a shop. The owner is always the authenticated caller.
#[derive(Debug, Clone)]
pub struct NewShop {
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub category: ShopCategory,
    pub image_url: String,
    pub location: String,
}

/// Partial update of a shop's profile fields.
///
/// Status is excluded: moderation status changes go through the admin
/// route only.
#[derive(Debug, Clone, Default)]
pub struct ShopUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<ShopCategory>,
    pub image_url: Option<String>,
    pub location: Option<String>,
}
