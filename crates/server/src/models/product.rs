//! Product model.

use serde::{Deserialize, Serialize};

use kasilink_core::{Price, ProductId, ShopId};

/// A product or service offered by a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub shop_id: ShopId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: String,
    pub in_stock: bool,
}

/// Fields for creating a product under a shop.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub shop_id: ShopId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: String,
    pub in_stock: bool,
}

/// Partial update of a product.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub image_url: Option<String>,
    pub in_stock: Option<bool>,
}
