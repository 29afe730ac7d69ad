//! `PostgreSQL` storage backend.
//!
//! Queries are runtime-checked (`sqlx::query_as`) so the crate builds
//! without a live database; the schema is pinned by the migrations in
//! `crates/server/migrations/`.

use async_trait::async_trait;
use sqlx::PgPool;

use kasilink_core::{
    OrderId, OrderStatus, OrderTransition, ProductId, Role, ShopCategory, ShopId, ShopStatus,
    TaskId, TaskStatus, TaskTransition, UserId,
};

use super::{Storage, StorageError};
use crate::models::{
    AdminStats, NewOrder, NewProduct, NewShop, NewTask, NewUser, Order, Product, ProductUpdate,
    Shop, ShopUpdate, Task, User,
};

/// Storage backed by a `PostgreSQL` connection pool.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool (used by the CLI for migrations).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, role, profile_image_url, created_at, updated_at";
const SHOP_COLUMNS: &str =
    "id, owner_id, name, description, category, image_url, location, status, created_at";
const PRODUCT_COLUMNS: &str = "id, shop_id, name, description, price, image_url, in_stock";
const TASK_COLUMNS: &str =
    "id, creator_id, title, description, budget, location, status, assignee_id, created_at";
const ORDER_COLUMNS: &str =
    "id, customer_id, shop_id, product_id, status, transport_id, created_at";

#[async_trait]
impl Storage for PgStorage {
    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    async fn upsert_user(&self, user: NewUser) -> Result<User, StorageError> {
        let sql = format!(
            "INSERT INTO users (id, email, first_name, last_name, profile_image_url)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                 email = EXCLUDED.email,
                 first_name = EXCLUDED.first_name,
                 last_name = EXCLUDED.last_name,
                 profile_image_url = EXCLUDED.profile_image_url,
                 updated_at = now()
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.profile_image_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC");
        Ok(sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_user_role(
        &self,
        id: &UserId,
        role: Role,
    ) -> Result<Option<User>, StorageError> {
        let sql = format!(
            "UPDATE users SET role = $2, updated_at = now() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(role)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_shops(
        &self,
        category: Option<ShopCategory>,
    ) -> Result<Vec<Shop>, StorageError> {
        let rows = match category {
            Some(category) => {
                let sql = format!(
                    "SELECT {SHOP_COLUMNS} FROM shops WHERE category = $1 ORDER BY id ASC"
                );
                sqlx::query_as::<_, Shop>(&sql)
                    .bind(category)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT {SHOP_COLUMNS} FROM shops ORDER BY id ASC");
                sqlx::query_as::<_, Shop>(&sql).fetch_all(&self.pool).await?
            }
        };
        Ok(rows)
    }

    async fn get_shop(&self, id: ShopId) -> Result<Option<Shop>, StorageError> {
        let sql = format!("SELECT {SHOP_COLUMNS} FROM shops WHERE id = $1");
        Ok(sqlx::query_as::<_, Shop>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_shops_by_owner(&self, owner_id: &UserId) -> Result<Vec<Shop>, StorageError> {
        let sql = format!("SELECT {SHOP_COLUMNS} FROM shops WHERE owner_id = $1 ORDER BY id ASC");
        Ok(sqlx::query_as::<_, Shop>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_shop(&self, shop: NewShop) -> Result<Shop, StorageError> {
        let sql = format!(
            "INSERT INTO shops (owner_id, name, description, category, image_url, location)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {SHOP_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Shop>(&sql)
            .bind(&shop.owner_id)
            .bind(&shop.name)
            .bind(&shop.description)
            .bind(shop.category)
            .bind(&shop.image_url)
            .bind(&shop.location)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_shop(
        &self,
        id: ShopId,
        update: ShopUpdate,
    ) -> Result<Option<Shop>, StorageError> {
        let sql = format!(
            "UPDATE shops SET
                 name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 category = COALESCE($4, category),
                 image_url = COALESCE($5, image_url),
                 location = COALESCE($6, location)
             WHERE id = $1
             RETURNING {SHOP_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Shop>(&sql)
            .bind(id)
            .bind(update.name)
            .bind(update.description)
            .bind(update.category)
            .bind(update.image_url)
            .bind(update.location)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_shop_status(
        &self,
        id: ShopId,
        status: ShopStatus,
    ) -> Result<Option<Shop>, StorageError> {
        let sql =
            format!("UPDATE shops SET status = $2 WHERE id = $1 RETURNING {SHOP_COLUMNS}");
        Ok(sqlx::query_as::<_, Shop>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_products_by_shop(&self, shop_id: ShopId) -> Result<Vec<Product>, StorageError> {
        let sql =
            format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE shop_id = $1 ORDER BY id ASC");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(shop_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, StorageError> {
        let sql = format!(
            "INSERT INTO products (shop_id, name, description, price, image_url, in_stock)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {PRODUCT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(product.shop_id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.image_url)
            .bind(product.in_stock)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, StorageError> {
        let sql = format!(
            "UPDATE products SET
                 name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 price = COALESCE($4, price),
                 image_url = COALESCE($5, image_url),
                 in_stock = COALESCE($6, in_stock)
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(update.name)
            .bind(update.description)
            .bind(update.price)
            .bind(update.image_url)
            .bind(update.in_stock)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, StorageError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id ASC");
        Ok(sqlx::query_as::<_, Task>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, StorageError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StorageError> {
        let sql = format!(
            "INSERT INTO tasks (creator_id, title, description, budget, location)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {TASK_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(&task.creator_id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.budget)
            .bind(&task.location)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn apply_task_transition(
        &self,
        id: TaskId,
        expected: TaskStatus,
        transition: &TaskTransition,
    ) -> Result<Option<Task>, StorageError> {
        let sql = format!(
            "UPDATE tasks SET status = $3, assignee_id = COALESCE($4, assignee_id)
             WHERE id = $1 AND status = $2
             RETURNING {TASK_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(expected)
            .bind(transition.status)
            .bind(&transition.assignee_id)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(task) => Ok(Some(task)),
            // Distinguish a missing row from a lost compare-and-swap.
            None => match self.get_task(id).await? {
                Some(_) => Err(StorageError::Conflict(
                    "task status changed concurrently".to_owned(),
                )),
                None => Ok(None),
            },
        }
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, StorageError> {
        let sql = format!(
            "INSERT INTO orders (customer_id, shop_id, product_id, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {ORDER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Order>(&sql)
            .bind(&order.customer_id)
            .bind(order.shop_id)
            .bind(order.product_id)
            .bind(order.status)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        Ok(sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StorageError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY id ASC");
        Ok(sqlx::query_as::<_, Order>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_orders_by_customer(
        &self,
        customer_id: &UserId,
    ) -> Result<Vec<Order>, StorageError> {
        let sql =
            format!("SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 ORDER BY id ASC");
        Ok(sqlx::query_as::<_, Order>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_orders_by_shop(&self, shop_id: ShopId) -> Result<Vec<Order>, StorageError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE shop_id = $1 ORDER BY id ASC");
        Ok(sqlx::query_as::<_, Order>(&sql)
            .bind(shop_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_pending_transport_orders(&self) -> Result<Vec<Order>, StorageError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE status = $1 ORDER BY id ASC"
        );
        Ok(sqlx::query_as::<_, Order>(&sql)
            .bind(OrderStatus::TransportRequested)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn apply_order_transition(
        &self,
        id: OrderId,
        expected: OrderStatus,
        transition: &OrderTransition,
    ) -> Result<Option<Order>, StorageError> {
        let sql = format!(
            "UPDATE orders SET status = $3, transport_id = COALESCE($4, transport_id)
             WHERE id = $1 AND status = $2
             RETURNING {ORDER_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(expected)
            .bind(transition.status)
            .bind(&transition.transport_id)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(order) => Ok(Some(order)),
            None => match self.get_order(id).await? {
                Some(_) => Err(StorageError::Conflict(
                    "order status changed concurrently".to_owned(),
                )),
                None => Ok(None),
            },
        }
    }

    async fn admin_stats(&self) -> Result<AdminStats, StorageError> {
        let sql = "SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM shops) AS total_shops,
                (SELECT COUNT(*) FROM shops WHERE status = 'active') AS active_shops,
                (SELECT COUNT(*) FROM products) AS total_products,
                (SELECT COUNT(*) FROM orders) AS total_orders,
                (SELECT COUNT(*) FROM orders WHERE status = 'transport_requested')
                    AS pending_transport_orders,
                (SELECT COUNT(*) FROM tasks) AS total_tasks,
                (SELECT COUNT(*) FROM tasks WHERE status = 'open') AS open_tasks";
        Ok(sqlx::query_as::<_, AdminStats>(sql)
            .fetch_one(&self.pool)
            .await?)
    }
}
