//! Data access interfaces
//!
//! Services depend on these traits only. `PgStore` is the production
//! implementation; `MemoryStore` backs development runs and tests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{
    Order, OrderItem, OrderStatus, OrderWithItems, Product, Shipment, ShipmentStatus, Supplier,
    SupplierStatus, User,
};
use shared::types::Role;

use crate::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Shared handle to the configured store
pub type DynStore = Arc<dyn Store>;

/// Product fields written on insert and update
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub stock: i32,
    pub min_stock_level: i32,
    pub supplier_id: i32,
}

#[derive(Debug, Clone)]
pub struct NewSupplier {
    pub name: String,
    pub contact: String,
    pub address: String,
    pub email: String,
    pub status: SupplierStatus,
}

/// Order header; the total is computed by the caller from its lines
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub supplier_id: Option<i32>,
    pub user_id: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct NewShipment {
    pub order_id: i32,
    pub tracking_number: String,
    pub status: ShipmentStatus,
    pub carrier: String,
    pub estimated_delivery_date: Option<DateTime<Utc>>,
    pub actual_delivery_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
}

/// A user together with its stored credential
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

#[axum::async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_products(&self) -> AppResult<Vec<Product>>;
    async fn find_product(&self, id: i32) -> AppResult<Option<Product>>;
    async fn insert_product(&self, product: NewProduct) -> AppResult<Product>;
    async fn update_product(&self, id: i32, product: NewProduct) -> AppResult<Option<Product>>;
    /// Returns false when no product had this id
    async fn delete_product(&self, id: i32) -> AppResult<bool>;
}

#[axum::async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>>;
    async fn find_supplier(&self, id: i32) -> AppResult<Option<Supplier>>;
    async fn insert_supplier(&self, supplier: NewSupplier) -> AppResult<Supplier>;
    async fn update_supplier(&self, id: i32, supplier: NewSupplier)
        -> AppResult<Option<Supplier>>;
    async fn delete_supplier(&self, id: i32) -> AppResult<bool>;
}

#[axum::async_trait]
pub trait OrderRepository: Send + Sync {
    async fn list_orders(&self) -> AppResult<Vec<Order>>;
    async fn find_order(&self, id: i32) -> AppResult<Option<Order>>;
    async fn order_items(&self, order_id: i32) -> AppResult<Vec<OrderItem>>;

    /// Persist an order and all of its lines atomically
    async fn insert_order(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> AppResult<OrderWithItems>;

    async fn update_order(
        &self,
        id: i32,
        status: OrderStatus,
        notes: Option<String>,
    ) -> AppResult<Option<Order>>;

    /// Deletes the order and its lines
    async fn delete_order(&self, id: i32) -> AppResult<bool>;
}

#[axum::async_trait]
pub trait ShipmentRepository: Send + Sync {
    async fn list_shipments(&self) -> AppResult<Vec<Shipment>>;
    async fn find_shipment(&self, id: i32) -> AppResult<Option<Shipment>>;
    async fn insert_shipment(&self, shipment: NewShipment) -> AppResult<Shipment>;

    /// Write every mutable field of `shipment` in a single statement
    async fn save_shipment(&self, shipment: &Shipment) -> AppResult<Option<Shipment>>;

    async fn delete_shipment(&self, id: i32) -> AppResult<bool>;
}

#[axum::async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self) -> AppResult<Vec<User>>;
    async fn find_user(&self, id: i32) -> AppResult<Option<UserRecord>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;
    async fn insert_user(&self, user: NewUser) -> AppResult<UserRecord>;
    async fn update_user(&self, id: i32, user: NewUser) -> AppResult<Option<UserRecord>>;
    async fn delete_user(&self, id: i32) -> AppResult<bool>;
}

/// Every repository the services need, behind one handle
#[axum::async_trait]
pub trait Store:
    CatalogRepository + SupplierRepository + OrderRepository + ShipmentRepository + UserRepository
{
    /// Connectivity probe for health checks
    async fn ping(&self) -> AppResult<()>;
}
