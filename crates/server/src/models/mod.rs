//! Domain models as served over the wire and stored in `PostgreSQL`.
//!
//! All structs serialize with camelCase field names to match the public
//! JSON API, and derive `sqlx::FromRow` for the Postgres storage backend.

pub mod admin;
pub mod order;
pub mod product;
pub mod shop;
pub mod task;
pub mod user;

pub use admin::{AdminStats, ShopDashboard};
pub use order::{NewOrder, Order};
pub use product::{NewProduct, Product, ProductUpdate};
pub use shop::{NewShop, Shop, ShopUpdate};
pub use task::{NewTask, Task};
pub use user::{NewUser, User};
