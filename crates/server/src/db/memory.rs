//! In-memory storage backend.
//!
//! Keeps every table in a `RwLock`-ed map. Used for local development
//! without a database and by the test suite. Semantics mirror the Postgres
//! backend, including the compare-and-swap guard on lifecycle transitions.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use kasilink_core::{
    OrderId, OrderStatus, OrderTransition, ProductId, Role, ShopCategory, ShopId, ShopStatus,
    TaskId, TaskStatus, TaskTransition, UserId,
};

use super::{Storage, StorageError};
use crate::models::{
    AdminStats, NewOrder, NewProduct, NewShop, NewTask, NewUser, Order, Product, ProductUpdate,
    Shop, ShopUpdate, Task, User,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<String, User>,
    shops: BTreeMap<i32, Shop>,
    products: BTreeMap<i32, Product>,
    tasks: BTreeMap<i32, Task>,
    orders: BTreeMap<i32, Order>,
    next_shop_id: i32,
    next_product_id: i32,
    next_task_id: i32,
    next_order_id: i32,
}

/// Storage backed by in-process maps.
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StorageError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StorageError::DataCorruption("storage lock poisoned".to_owned()))?;
        Ok(f(&tables))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> Result<T, StorageError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StorageError::DataCorruption("storage lock poisoned".to_owned()))?;
        Ok(f(&mut tables))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> Result<(), StorageError> {
        self.read(|_| ())
    }

    async fn upsert_user(&self, user: NewUser) -> Result<User, StorageError> {
        self.write(|t| {
            let now = Utc::now();
            let entry = t
                .users
                .entry(user.id.as_str().to_owned())
                .and_modify(|existing| {
                    existing.email = user.email.clone();
                    existing.first_name = user.first_name.clone();
                    existing.last_name = user.last_name.clone();
                    existing.profile_image_url = user.profile_image_url.clone();
                    existing.updated_at = now;
                })
                .or_insert_with(|| User {
                    id: user.id.clone(),
                    email: user.email.clone(),
                    first_name: user.first_name.clone(),
                    last_name: user.last_name.clone(),
                    role: Role::default(),
                    profile_image_url: user.profile_image_url.clone(),
                    created_at: now,
                    updated_at: now,
                });
            entry.clone()
        })
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        self.read(|t| t.users.get(id.as_str()).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        self.read(|t| {
            let mut users: Vec<User> = t.users.values().cloned().collect();
            users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            users
        })
    }

    async fn update_user_role(
        &self,
        id: &UserId,
        role: Role,
    ) -> Result<Option<User>, StorageError> {
        self.write(|t| {
            t.users.get_mut(id.as_str()).map(|user| {
                user.role = role;
                user.updated_at = Utc::now();
                user.clone()
            })
        })
    }

    async fn list_shops(
        &self,
        category: Option<ShopCategory>,
    ) -> Result<Vec<Shop>, StorageError> {
        self.read(|t| {
            t.shops
                .values()
                .filter(|shop| category.is_none_or(|c| shop.category == c))
                .cloned()
                .collect()
        })
    }

    async fn get_shop(&self, id: ShopId) -> Result<Option<Shop>, StorageError> {
        self.read(|t| t.shops.get(&id.as_i32()).cloned())
    }

    async fn list_shops_by_owner(&self, owner_id: &UserId) -> Result<Vec<Shop>, StorageError> {
        self.read(|t| {
            t.shops
                .values()
                .filter(|shop| &shop.owner_id == owner_id)
                .cloned()
                .collect()
        })
    }

    async fn create_shop(&self, shop: NewShop) -> Result<Shop, StorageError> {
        self.write(|t| {
            t.next_shop_id += 1;
            let created = Shop {
                id: ShopId::new(t.next_shop_id),
                owner_id: shop.owner_id,
                name: shop.name,
                description: shop.description,
                category: shop.category,
                image_url: shop.image_url,
                location: shop.location,
                status: ShopStatus::default(),
                created_at: Utc::now(),
            };
            t.shops.insert(created.id.as_i32(), created.clone());
            created
        })
    }

    async fn update_shop(
        &self,
        id: ShopId,
        update: ShopUpdate,
    ) -> Result<Option<Shop>, StorageError> {
        self.write(|t| {
            t.shops.get_mut(&id.as_i32()).map(|shop| {
                if let Some(name) = update.name {
                    shop.name = name;
                }
                if let Some(description) = update.description {
                    shop.description = description;
                }
                if let Some(category) = update.category {
                    shop.category = category;
                }
                if let Some(image_url) = update.image_url {
                    shop.image_url = image_url;
                }
                if let Some(location) = update.location {
                    shop.location = location;
                }
                shop.clone()
            })
        })
    }

    async fn update_shop_status(
        &self,
        id: ShopId,
        status: ShopStatus,
    ) -> Result<Option<Shop>, StorageError> {
        self.write(|t| {
            t.shops.get_mut(&id.as_i32()).map(|shop| {
                shop.status = status;
                shop.clone()
            })
        })
    }

    async fn list_products_by_shop(&self, shop_id: ShopId) -> Result<Vec<Product>, StorageError> {
        self.read(|t| {
            t.products
                .values()
                .filter(|product| product.shop_id == shop_id)
                .cloned()
                .collect()
        })
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        self.read(|t| t.products.get(&id.as_i32()).cloned())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, StorageError> {
        self.write(|t| {
            t.next_product_id += 1;
            let created = Product {
                id: ProductId::new(t.next_product_id),
                shop_id: product.shop_id,
                name: product.name,
                description: product.description,
                price: product.price,
                image_url: product.image_url,
                in_stock: product.in_stock,
            };
            t.products.insert(created.id.as_i32(), created.clone());
            created
        })
    }

    async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Option<Product>, StorageError> {
        self.write(|t| {
            t.products.get_mut(&id.as_i32()).map(|product| {
                if let Some(name) = update.name {
                    product.name = name;
                }
                if let Some(description) = update.description {
                    product.description = description;
                }
                if let Some(price) = update.price {
                    product.price = price;
                }
                if let Some(image_url) = update.image_url {
                    product.image_url = image_url;
                }
                if let Some(in_stock) = update.in_stock {
                    product.in_stock = in_stock;
                }
                product.clone()
            })
        })
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, StorageError> {
        self.write(|t| t.products.remove(&id.as_i32()).is_some())
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, StorageError> {
        self.read(|t| t.tasks.values().cloned().collect())
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<Task>, StorageError> {
        self.read(|t| t.tasks.get(&id.as_i32()).cloned())
    }

    async fn create_task(&self, task: NewTask) -> Result<Task, StorageError> {
        self.write(|t| {
            t.next_task_id += 1;
            let created = Task {
                id: TaskId::new(t.next_task_id),
                creator_id: task.creator_id,
                title: task.title,
                description: task.description,
                budget: task.budget,
                location: task.location,
                status: TaskStatus::default(),
                assignee_id: None,
                created_at: Utc::now(),
            };
            t.tasks.insert(created.id.as_i32(), created.clone());
            created
        })
    }

    async fn apply_task_transition(
        &self,
        id: TaskId,
        expected: TaskStatus,
        transition: &TaskTransition,
    ) -> Result<Option<Task>, StorageError> {
        self.write(|t| {
            let Some(task) = t.tasks.get_mut(&id.as_i32()) else {
                return Ok(None);
            };
            if task.status != expected {
                return Err(StorageError::Conflict(
                    "task status changed concurrently".to_owned(),
                ));
            }
            task.status = transition.status;
            if let Some(assignee) = &transition.assignee_id {
                task.assignee_id = Some(assignee.clone());
            }
            Ok(Some(task.clone()))
        })?
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, StorageError> {
        self.write(|t| {
            t.next_order_id += 1;
            let created = Order {
                id: OrderId::new(t.next_order_id),
                customer_id: order.customer_id,
                shop_id: order.shop_id,
                product_id: order.product_id,
                status: order.status,
                transport_id: None,
                created_at: Utc::now(),
            };
            t.orders.insert(created.id.as_i32(), created.clone());
            created
        })
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
        self.read(|t| t.orders.get(&id.as_i32()).cloned())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StorageError> {
        self.read(|t| t.orders.values().cloned().collect())
    }

    async fn list_orders_by_customer(
        &self,
        customer_id: &UserId,
    ) -> Result<Vec<Order>, StorageError> {
        self.read(|t| {
            t.orders
                .values()
                .filter(|order| &order.customer_id == customer_id)
                .cloned()
                .collect()
        })
    }

    async fn list_orders_by_shop(&self, shop_id: ShopId) -> Result<Vec<Order>, StorageError> {
        self.read(|t| {
            t.orders
                .values()
                .filter(|order| order.shop_id == shop_id)
                .cloned()
                .collect()
        })
    }

    async fn list_pending_transport_orders(&self) -> Result<Vec<Order>, StorageError> {
        self.read(|t| {
            t.orders
                .values()
                .filter(|order| order.status == OrderStatus::TransportRequested)
                .cloned()
                .collect()
        })
    }

    async fn apply_order_transition(
        &self,
        id: OrderId,
        expected: OrderStatus,
        transition: &OrderTransition,
    ) -> Result<Option<Order>, StorageError> {
        self.write(|t| {
            let Some(order) = t.orders.get_mut(&id.as_i32()) else {
                return Ok(None);
            };
            if order.status != expected {
                return Err(StorageError::Conflict(
                    "order status changed concurrently".to_owned(),
                ));
            }
            order.status = transition.status;
            if let Some(transporter) = &transition.transport_id {
                order.transport_id = Some(transporter.clone());
            }
            Ok(Some(order.clone()))
        })?
    }

    async fn admin_stats(&self) -> Result<AdminStats, StorageError> {
        self.read(|t| AdminStats {
            total_users: t.users.len() as i64,
            total_shops: t.shops.len() as i64,
            active_shops: t
                .shops
                .values()
                .filter(|s| s.status == ShopStatus::Active)
                .count() as i64,
            total_products: t.products.len() as i64,
            total_orders: t.orders.len() as i64,
            pending_transport_orders: t
                .orders
                .values()
                .filter(|o| o.status == OrderStatus::TransportRequested)
                .count() as i64,
            total_tasks: t.tasks.len() as i64,
            open_tasks: t
                .tasks
                .values()
                .filter(|task| task.status == TaskStatus::Open)
                .count() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use kasilink_core::{Email, Price};
    use rust_decimal::Decimal;

    use super::*;

    fn new_user(id: &str) -> NewUser {
        NewUser {
            id: UserId::from(id),
            email: Email::parse(&format!("{id}@example.com")).expect("valid email"),
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            profile_image_url: None,
        }
    }

    fn price(s: &str) -> Price {
        Price::new(s.parse::<Decimal>().expect("decimal")).expect("positive")
    }

    #[tokio::test]
    async fn test_upsert_preserves_role_and_created_at() {
        let store = MemoryStorage::new();
        let user = store.upsert_user(new_user("u1")).await.expect("insert");
        assert_eq!(user.role, Role::Customer);

        store
            .update_user_role(&user.id, Role::Admin)
            .await
            .expect("role update");

        let mut refreshed = new_user("u1");
        refreshed.first_name = "Changed".to_owned();
        let user = store.upsert_user(refreshed).await.expect("upsert");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.first_name, "Changed");
    }

    #[tokio::test]
    async fn test_task_transition_cas_detects_race() {
        let store = MemoryStorage::new();
        store.upsert_user(new_user("creator")).await.expect("user");
        let task = store
            .create_task(NewTask {
                creator_id: UserId::from("creator"),
                title: "Deliver parcel".to_owned(),
                description: "From X to Y".to_owned(),
                budget: price("150"),
                location: "Soweto".to_owned(),
            })
            .await
            .expect("task");

        let take = TaskTransition {
            status: TaskStatus::InProgress,
            assignee_id: Some(UserId::from("runner-1")),
        };
        let taken = store
            .apply_task_transition(task.id, TaskStatus::Open, &take)
            .await
            .expect("first take")
            .expect("task exists");
        assert_eq!(taken.assignee_id, Some(UserId::from("runner-1")));

        // A second take raced and lost: the guard must refuse it.
        let second = TaskTransition {
            status: TaskStatus::InProgress,
            assignee_id: Some(UserId::from("runner-2")),
        };
        let err = store
            .apply_task_transition(task.id, TaskStatus::Open, &second)
            .await
            .expect_err("stale expected status");
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_missing_task_is_none_not_conflict() {
        let store = MemoryStorage::new();
        let transition = TaskTransition {
            status: TaskStatus::Completed,
            assignee_id: None,
        };
        let result = store
            .apply_task_transition(TaskId::new(99), TaskStatus::Open, &transition)
            .await
            .expect("no storage error");
        assert!(result.is_none());
    }
}
