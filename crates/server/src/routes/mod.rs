//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! # Shops
//! GET   /api/shops                     - List shops (optional ?category=)
//! GET   /api/shops/{id}                - Shop detail
//! POST  /api/shops                     - Create shop (auth)
//! PATCH /api/shops/{id}                - Edit shop profile (owner)
//!
//! # Products
//! GET   /api/shops/{shopId}/products   - List a shop's products
//! POST  /api/shops/{shopId}/products   - Add product (owner)
//! PATCH /api/products/{id}             - Edit product (owner or admin)
//! DELETE /api/products/{id}            - Remove product (owner or admin)
//!
//! # Tasks
//! GET   /api/tasks                     - List tasks
//! POST  /api/tasks                     - Post task (auth)
//! PATCH /api/tasks/{id}/status         - Take or complete a task
//!
//! # Orders
//! POST  /api/orders                    - Place order (auth)
//! GET   /api/orders/my                 - Caller's orders
//! GET   /api/orders/pending-transport  - Orders awaiting a transporter
//! PATCH /api/orders/{id}/status        - Advance order lifecycle
//! GET   /api/shops/{shopId}/orders     - Orders against a shop (owner/admin)
//!
//! # Shop owner
//! GET   /api/shop-owner/dashboard      - Per-shop roll-up for owned shops
//!
//! # Admin
//! GET   /api/admin/stats               - Platform counters
//! GET   /api/admin/users               - All users
//! GET   /api/admin/shops               - All shops
//! GET   /api/admin/orders              - All orders
//! PATCH /api/admin/shops/{id}/status   - Moderate shop status
//! PATCH /api/admin/users/{id}/role     - Change user role
//!
//! # Auth
//! GET   /api/auth/user                 - Caller's stored profile
//! ```

pub mod admin;
pub mod auth;
pub mod orders;
pub mod products;
pub mod shop_owner;
pub mod shops;
pub mod tasks;
mod validate;

use axum::Router;

use crate::state::AppState;

/// Assemble the `/api` router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(shops::router())
        .merge(products::router())
        .merge(tasks::router())
        .merge(orders::router())
        .merge(shop_owner::router())
        .merge(admin::router())
        .merge(auth::router())
}
