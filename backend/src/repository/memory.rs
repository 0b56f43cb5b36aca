//! In-process store
//!
//! Mirrors the relational constraints of the Postgres schema (unique keys,
//! restricted deletes, cascading order lines) so both stores behave alike.
//! All writes take a single lock, which makes multi-row writes atomic.

use std::collections::BTreeMap;

use chrono::Utc;
use shared::models::{
    Order, OrderItem, OrderStatus, OrderWithItems, Product, Shipment, Supplier, User,
};
use tokio::sync::RwLock;

use super::{
    CatalogRepository, NewOrder, NewOrderItem, NewProduct, NewShipment, NewSupplier, NewUser,
    OrderRepository, ShipmentRepository, Store, SupplierRepository, UserRecord, UserRepository,
};
use crate::error::{AppError, AppResult};

#[derive(Default)]
struct Sequences {
    product: i32,
    supplier: i32,
    order: i32,
    order_item: i32,
    shipment: i32,
    user: i32,
}

fn next(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

#[derive(Default)]
struct Tables {
    seq: Sequences,
    products: BTreeMap<i32, Product>,
    suppliers: BTreeMap<i32, Supplier>,
    orders: BTreeMap<i32, Order>,
    order_items: BTreeMap<i32, OrderItem>,
    shipments: BTreeMap<i32, Shipment>,
    users: BTreeMap<i32, UserRecord>,
}

fn restricted(constraint: &str) -> AppError {
    AppError::Conflict {
        resource: constraint.to_string(),
        message: "Record is still referenced by other records".to_string(),
    }
}

impl Tables {
    fn check_order_refs(&self, supplier_id: Option<i32>, user_id: Option<i32>) -> AppResult<()> {
        if let Some(id) = supplier_id {
            if !self.suppliers.contains_key(&id) {
                return Err(restricted("orders_supplier_id_fkey"));
            }
        }
        if let Some(id) = user_id {
            if !self.users.contains_key(&id) {
                return Err(restricted("orders_user_id_fkey"));
            }
        }
        Ok(())
    }

    fn check_email_free(&self, email: &str, except: Option<i32>) -> AppResult<()> {
        let taken = self
            .users
            .values()
            .any(|r| r.user.email == email && Some(r.user.id) != except);
        if taken {
            return Err(AppError::DuplicateEntry("Email".to_string()));
        }
        Ok(())
    }

    fn check_tracking_free(&self, tracking_number: &str, except: Option<i32>) -> AppResult<()> {
        let taken = self
            .shipments
            .values()
            .any(|s| s.tracking_number == tracking_number && Some(s.id) != except);
        if taken {
            return Err(AppError::DuplicateEntry("TrackingNumber".to_string()));
        }
        Ok(())
    }
}

/// Store backed by process memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[axum::async_trait]
impl CatalogRepository for MemoryStore {
    async fn list_products(&self) -> AppResult<Vec<Product>> {
        Ok(self.tables.read().await.products.values().cloned().collect())
    }

    async fn find_product(&self, id: i32) -> AppResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn insert_product(&self, product: NewProduct) -> AppResult<Product> {
        let mut tables = self.tables.write().await;
        if !tables.suppliers.contains_key(&product.supplier_id) {
            return Err(restricted("products_supplier_id_fkey"));
        }

        let now = Utc::now();
        let id = next(&mut tables.seq.product);
        let created = Product {
            id,
            name: product.name,
            description: product.description,
            category: product.category,
            price: product.price,
            stock: product.stock,
            min_stock_level: product.min_stock_level,
            supplier_id: product.supplier_id,
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(id, created.clone());
        Ok(created)
    }

    async fn update_product(&self, id: i32, product: NewProduct) -> AppResult<Option<Product>> {
        let mut tables = self.tables.write().await;
        if !tables.suppliers.contains_key(&product.supplier_id) {
            return Err(restricted("products_supplier_id_fkey"));
        }

        let Some(existing) = tables.products.get_mut(&id) else {
            return Ok(None);
        };
        existing.name = product.name;
        existing.description = product.description;
        existing.category = product.category;
        existing.price = product.price;
        existing.stock = product.stock;
        existing.min_stock_level = product.min_stock_level;
        existing.supplier_id = product.supplier_id;
        existing.updated_at = Utc::now();
        Ok(Some(existing.clone()))
    }

    async fn delete_product(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.order_items.values().any(|i| i.product_id == id) {
            return Err(restricted("order_items_product_id_fkey"));
        }
        Ok(tables.products.remove(&id).is_some())
    }
}

#[axum::async_trait]
impl SupplierRepository for MemoryStore {
    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        Ok(self.tables.read().await.suppliers.values().cloned().collect())
    }

    async fn find_supplier(&self, id: i32) -> AppResult<Option<Supplier>> {
        Ok(self.tables.read().await.suppliers.get(&id).cloned())
    }

    async fn insert_supplier(&self, supplier: NewSupplier) -> AppResult<Supplier> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let id = next(&mut tables.seq.supplier);
        let created = Supplier {
            id,
            name: supplier.name,
            contact: supplier.contact,
            address: supplier.address,
            email: supplier.email,
            status: supplier.status,
            created_at: now,
            updated_at: now,
        };
        tables.suppliers.insert(id, created.clone());
        Ok(created)
    }

    async fn update_supplier(
        &self,
        id: i32,
        supplier: NewSupplier,
    ) -> AppResult<Option<Supplier>> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.suppliers.get_mut(&id) else {
            return Ok(None);
        };
        existing.name = supplier.name;
        existing.contact = supplier.contact;
        existing.address = supplier.address;
        existing.email = supplier.email;
        existing.status = supplier.status;
        existing.updated_at = Utc::now();
        Ok(Some(existing.clone()))
    }

    async fn delete_supplier(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.products.values().any(|p| p.supplier_id == id) {
            return Err(restricted("products_supplier_id_fkey"));
        }
        if tables.orders.values().any(|o| o.supplier_id == Some(id)) {
            return Err(restricted("orders_supplier_id_fkey"));
        }
        Ok(tables.suppliers.remove(&id).is_some())
    }
}

#[axum::async_trait]
impl OrderRepository for MemoryStore {
    async fn list_orders(&self) -> AppResult<Vec<Order>> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn find_order(&self, id: i32) -> AppResult<Option<Order>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn order_items(&self, order_id: i32) -> AppResult<Vec<OrderItem>> {
        Ok(self
            .tables
            .read()
            .await
            .order_items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn insert_order(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> AppResult<OrderWithItems> {
        let mut tables = self.tables.write().await;

        // Validate everything before the first write so a failure leaves no trace
        tables.check_order_refs(order.supplier_id, order.user_id)?;
        if items
            .iter()
            .any(|item| !tables.products.contains_key(&item.product_id))
        {
            return Err(restricted("order_items_product_id_fkey"));
        }

        let now = Utc::now();
        let order_id = next(&mut tables.seq.order);
        let created = Order {
            id: order_id,
            order_date: order.order_date,
            status: order.status,
            total_amount: order.total_amount,
            supplier_id: order.supplier_id,
            user_id: order.user_id,
            notes: order.notes,
            created_at: now,
            updated_at: now,
        };
        tables.orders.insert(order_id, created.clone());

        let mut created_items = Vec::with_capacity(items.len());
        for item in items {
            let item_id = next(&mut tables.seq.order_item);
            let row = OrderItem {
                id: item_id,
                order_id,
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: item.total_price,
                created_at: now,
            };
            tables.order_items.insert(item_id, row.clone());
            created_items.push(row);
        }

        Ok(OrderWithItems {
            order: created,
            items: created_items,
        })
    }

    async fn update_order(
        &self,
        id: i32,
        status: OrderStatus,
        notes: Option<String>,
    ) -> AppResult<Option<Order>> {
        let mut tables = self.tables.write().await;
        let Some(existing) = tables.orders.get_mut(&id) else {
            return Ok(None);
        };
        existing.status = status;
        existing.notes = notes;
        existing.updated_at = Utc::now();
        Ok(Some(existing.clone()))
    }

    async fn delete_order(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.shipments.values().any(|s| s.order_id == id) {
            return Err(restricted("shipments_order_id_fkey"));
        }
        if tables.orders.remove(&id).is_none() {
            return Ok(false);
        }
        tables.order_items.retain(|_, item| item.order_id != id);
        Ok(true)
    }
}

#[axum::async_trait]
impl ShipmentRepository for MemoryStore {
    async fn list_shipments(&self) -> AppResult<Vec<Shipment>> {
        Ok(self.tables.read().await.shipments.values().cloned().collect())
    }

    async fn find_shipment(&self, id: i32) -> AppResult<Option<Shipment>> {
        Ok(self.tables.read().await.shipments.get(&id).cloned())
    }

    async fn insert_shipment(&self, shipment: NewShipment) -> AppResult<Shipment> {
        let mut tables = self.tables.write().await;
        if !tables.orders.contains_key(&shipment.order_id) {
            return Err(restricted("shipments_order_id_fkey"));
        }
        tables.check_tracking_free(&shipment.tracking_number, None)?;

        let now = Utc::now();
        let id = next(&mut tables.seq.shipment);
        let created = Shipment {
            id,
            order_id: shipment.order_id,
            tracking_number: shipment.tracking_number,
            status: shipment.status,
            carrier: shipment.carrier,
            estimated_delivery_date: shipment.estimated_delivery_date,
            actual_delivery_date: shipment.actual_delivery_date,
            notes: shipment.notes,
            created_at: now,
            updated_at: now,
        };
        tables.shipments.insert(id, created.clone());
        Ok(created)
    }

    async fn save_shipment(&self, shipment: &Shipment) -> AppResult<Option<Shipment>> {
        let mut tables = self.tables.write().await;
        tables.check_tracking_free(&shipment.tracking_number, Some(shipment.id))?;

        let Some(existing) = tables.shipments.get_mut(&shipment.id) else {
            return Ok(None);
        };
        existing.tracking_number = shipment.tracking_number.clone();
        existing.status = shipment.status;
        existing.carrier = shipment.carrier.clone();
        existing.estimated_delivery_date = shipment.estimated_delivery_date;
        existing.actual_delivery_date = shipment.actual_delivery_date;
        existing.notes = shipment.notes.clone();
        existing.updated_at = Utc::now();
        Ok(Some(existing.clone()))
    }

    async fn delete_shipment(&self, id: i32) -> AppResult<bool> {
        Ok(self.tables.write().await.shipments.remove(&id).is_some())
    }
}

#[axum::async_trait]
impl UserRepository for MemoryStore {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .map(|r| r.user.clone())
            .collect())
    }

    async fn find_user(&self, id: i32) -> AppResult<Option<UserRecord>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|r| r.user.email == email)
            .cloned())
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut tables = self.tables.write().await;
        tables.check_email_free(&user.email, None)?;

        let now = Utc::now();
        let id = next(&mut tables.seq.user);
        let record = UserRecord {
            user: User {
                id,
                name: user.name,
                email: user.email,
                role: user.role,
                created_at: now,
                updated_at: now,
            },
            password_hash: user.password_hash,
        };
        tables.users.insert(id, record.clone());
        Ok(record)
    }

    async fn update_user(&self, id: i32, user: NewUser) -> AppResult<Option<UserRecord>> {
        let mut tables = self.tables.write().await;
        tables.check_email_free(&user.email, Some(id))?;

        let Some(existing) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        existing.user.name = user.name;
        existing.user.email = user.email;
        existing.user.role = user.role;
        existing.user.updated_at = Utc::now();
        existing.password_hash = user.password_hash;
        Ok(Some(existing.clone()))
    }

    async fn delete_user(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.orders.values().any(|o| o.user_id == Some(id)) {
            return Err(restricted("orders_user_id_fkey"));
        }
        Ok(tables.users.remove(&id).is_some())
    }
}

#[axum::async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
