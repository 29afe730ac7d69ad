//! Storage backends for the marketplace.
//!
//! All durable state lives behind the [`Storage`] trait: a flat
//! CRUD-with-filter interface plus compare-and-swap transition writes for
//! the two lifecycle machines. The server holds no other mutable state
//! across requests.
//!
//! Two backends are provided:
//!
//! - [`PgStorage`] - `PostgreSQL` via sqlx (production). Migrations live in
//!   `crates/server/migrations/` and run via `kasilink-cli migrate`.
//! - [`MemoryStorage`] - in-process maps, used when no database is
//!   configured (local development) and by the test suite.

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use kasilink_core::{
    OrderId, OrderStatus, OrderTransition, ProductId, Role, ShopCategory, ShopId, ShopStatus,
    TaskId, TaskStatus, TaskTransition, UserId,
};

use crate::models::{
    AdminStats, NewOrder, NewProduct, NewShop, NewTask, NewUser, Order, Product, ProductUpdate,
    Shop, ShopUpdate, Task, User,
};

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

/// Errors from storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The row's current state no longer matches the caller's expectation
    /// (lost compare-and-swap) or a constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// The injected data-access interface.
///
/// Every method is a single filtered read or a single-row write. Lifecycle
/// transition writes (`apply_task_transition`, `apply_order_transition`)
/// are guarded by the expected current status: if the row moved on
/// concurrently, the write does not happen and `Conflict` is returned
/// instead of last-write-wins.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Backend connectivity check for the readiness probe.
    async fn ping(&self) -> Result<(), StorageError>;

    // Users

    /// Insert or refresh a user profile row keyed by the verified subject
    /// id. Never changes the id or role of an existing row.
    async fn upsert_user(&self, user: NewUser) -> Result<User, StorageError>;
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, StorageError>;
    async fn list_users(&self) -> Result<Vec<User>, StorageError>;
    async fn update_user_role(&self, id: &UserId, role: Role)
    -> Result<Option<User>, StorageError>;

    // Shops

    async fn list_shops(&self, category: Option<ShopCategory>)
    -> Result<Vec<Shop>, StorageError>;
    async fn get_shop(&self, id: ShopId) -> Result<Option<Shop>, StorageError>;
    async fn list_shops_by_owner(&self, owner_id: &UserId) -> Result<Vec<Shop>, StorageError>;
    async fn create_shop(&self, shop: NewShop) -> Result<Shop, StorageError>;
    async fn update_shop(
        &self,
        id: ShopId,
        update: ShopUpdate,
    ) -> Result<Option<Shop>, StorageError>;
    async fn update_shop_status(
        &self,
        id: ShopId,
        status: ShopStatus,
    ) -> Result<Option<Shop>, StorageError>;

    // Products

    async fn list_products_by_shop(&self, shop_id: ShopId) -> Result<Vec<Product>, StorageError>;
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StorageError>;
    async fn create_product(&self, product: NewProduct) -> Result<Product, StorageError>;
    async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, StorageError>;
    /// Returns `true` if the product existed and was deleted.
    async fn delete_product(&self, id: ProductId) -> Result<bool, StorageError>;

    // Tasks

    async fn list_tasks(&self) -> Result<Vec<Task>, StorageError>;
    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, StorageError>;
    async fn create_task(&self, task: NewTask) -> Result<Task, StorageError>;
    /// Apply a computed task transition, guarded on the expected current
    /// status. `Ok(None)` means the task does not exist; `Conflict` means
    /// it exists but its status changed under the caller.
    async fn apply_task_transition(
        &self,
        id: TaskId,
        expected: TaskStatus,
        transition: &TaskTransition,
    ) -> Result<Option<Task>, StorageError>;

    // Orders

    async fn create_order(&self, order: NewOrder) -> Result<Order, StorageError>;
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StorageError>;
    async fn list_orders(&self) -> Result<Vec<Order>, StorageError>;
    async fn list_orders_by_customer(
        &self,
        customer_id: &UserId,
    ) -> Result<Vec<Order>, StorageError>;
    async fn list_orders_by_shop(&self, shop_id: ShopId) -> Result<Vec<Order>, StorageError>;
    /// Orders awaiting a transporter (status == `transport_requested`).
    async fn list_pending_transport_orders(&self) -> Result<Vec<Order>, StorageError>;
    /// Apply a computed order transition, guarded like
    /// [`apply_task_transition`](Storage::apply_task_transition).
    async fn apply_order_transition(
        &self,
        id: OrderId,
        expected: OrderStatus,
        transition: &OrderTransition,
    ) -> Result<Option<Order>, StorageError>;

    // Admin

    async fn admin_stats(&self) -> Result<AdminStats, StorageError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
