//! PostgreSQL store backed by sqlx

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{
    Order, OrderItem, OrderStatus, OrderWithItems, Product, Shipment, Supplier, User,
};
use shared::types::UnknownVariant;
use sqlx::{FromRow, PgPool};

use super::{
    CatalogRepository, NewOrder, NewOrderItem, NewProduct, NewShipment, NewSupplier, NewUser,
    OrderRepository, ShipmentRepository, Store, SupplierRepository, UserRecord, UserRepository,
};
use crate::error::{AppError, AppResult};

/// Store backed by a Postgres connection pool
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// A stored enum column that no longer parses
fn corrupt(err: UnknownVariant) -> AppError {
    AppError::Internal(format!("corrupt row: {}", err))
}

const PRODUCT_COLUMNS: &str = "id, name, description, category, price, stock, min_stock_level, \
     supplier_id, created_at, updated_at";

const SUPPLIER_COLUMNS: &str = "id, name, contact, address, email, status, created_at, updated_at";

const ORDER_COLUMNS: &str =
    "id, order_date, status, total_amount, supplier_id, user_id, notes, created_at, updated_at";

const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, product_id, quantity, unit_price, total_price, created_at";

const SHIPMENT_COLUMNS: &str = "id, order_id, tracking_number, status, carrier, \
     estimated_delivery_date, actual_delivery_date, notes, created_at, updated_at";

const USER_COLUMNS: &str = "id, name, email, role, password_hash, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    category: String,
    price: Decimal,
    stock: i32,
    min_stock_level: i32,
    supplier_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            name: r.name,
            description: r.description,
            category: r.category,
            price: r.price,
            stock: r.stock,
            min_stock_level: r.min_stock_level,
            supplier_id: r.supplier_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SupplierRow {
    id: i32,
    name: String,
    contact: String,
    address: String,
    email: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SupplierRow> for Supplier {
    type Error = AppError;

    fn try_from(r: SupplierRow) -> AppResult<Self> {
        Ok(Supplier {
            id: r.id,
            name: r.name,
            contact: r.contact,
            address: r.address,
            email: r.email,
            status: r.status.parse().map_err(corrupt)?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i32,
    order_date: DateTime<Utc>,
    status: String,
    total_amount: Decimal,
    supplier_id: Option<i32>,
    user_id: Option<i32>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = AppError;

    fn try_from(r: OrderRow) -> AppResult<Self> {
        Ok(Order {
            id: r.id,
            order_date: r.order_date,
            status: r.status.parse().map_err(corrupt)?,
            total_amount: r.total_amount,
            supplier_id: r.supplier_id,
            user_id: r.user_id,
            notes: r.notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    quantity: i32,
    unit_price: Decimal,
    total_price: Decimal,
    created_at: DateTime<Utc>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(r: OrderItemRow) -> Self {
        OrderItem {
            id: r.id,
            order_id: r.order_id,
            product_id: r.product_id,
            quantity: r.quantity,
            unit_price: r.unit_price,
            total_price: r.total_price,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ShipmentRow {
    id: i32,
    order_id: i32,
    tracking_number: String,
    status: String,
    carrier: String,
    estimated_delivery_date: Option<DateTime<Utc>>,
    actual_delivery_date: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ShipmentRow> for Shipment {
    type Error = AppError;

    fn try_from(r: ShipmentRow) -> AppResult<Self> {
        Ok(Shipment {
            id: r.id,
            order_id: r.order_id,
            tracking_number: r.tracking_number,
            status: r.status.parse().map_err(corrupt)?,
            carrier: r.carrier,
            estimated_delivery_date: r.estimated_delivery_date,
            actual_delivery_date: r.actual_delivery_date,
            notes: r.notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = AppError;

    fn try_from(r: UserRow) -> AppResult<Self> {
        Ok(UserRecord {
            user: User {
                id: r.id,
                name: r.name,
                email: r.email,
                role: r.role.parse().map_err(corrupt)?,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
            password_hash: r.password_hash,
        })
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> AppResult<Vec<T>>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[axum::async_trait]
impl CatalogRepository for PgStore {
    async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_product(&self, id: i32) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn insert_product(&self, product: NewProduct) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (name, description, category, price, stock, min_stock_level, supplier_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.min_stock_level)
        .bind(product.supplier_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn update_product(&self, id: i32, product: NewProduct) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, category = $4, price = $5, stock = $6,
                min_stock_level = $7, supplier_id = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.min_stock_level)
        .bind(product.supplier_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn delete_product(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[axum::async_trait]
impl SupplierRepository for PgStore {
    async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {} FROM suppliers ORDER BY id",
            SUPPLIER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        convert_all(rows)
    }

    async fn find_supplier(&self, id: i32) -> AppResult<Option<Supplier>> {
        sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {} FROM suppliers WHERE id = $1",
            SUPPLIER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .map(Supplier::try_from)
        .transpose()
    }

    async fn insert_supplier(&self, supplier: NewSupplier) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            r#"
            INSERT INTO suppliers (name, contact, address, email, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            SUPPLIER_COLUMNS
        ))
        .bind(&supplier.name)
        .bind(&supplier.contact)
        .bind(&supplier.address)
        .bind(&supplier.email)
        .bind(supplier.status.as_str())
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    async fn update_supplier(
        &self,
        id: i32,
        supplier: NewSupplier,
    ) -> AppResult<Option<Supplier>> {
        sqlx::query_as::<_, SupplierRow>(&format!(
            r#"
            UPDATE suppliers
            SET name = $2, contact = $3, address = $4, email = $5, status = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SUPPLIER_COLUMNS
        ))
        .bind(id)
        .bind(&supplier.name)
        .bind(&supplier.contact)
        .bind(&supplier.address)
        .bind(&supplier.email)
        .bind(supplier.status.as_str())
        .fetch_optional(&self.db)
        .await?
        .map(Supplier::try_from)
        .transpose()
    }

    async fn delete_supplier(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[axum::async_trait]
impl OrderRepository for PgStore {
    async fn list_orders(&self) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders ORDER BY order_date DESC, id DESC",
            ORDER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        convert_all(rows)
    }

    async fn find_order(&self, id: i32) -> AppResult<Option<Order>> {
        sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .map(Order::try_from)
        .transpose()
    }

    async fn order_items(&self, order_id: i32) -> AppResult<Vec<OrderItem>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {} FROM order_items WHERE order_id = $1 ORDER BY id",
            ORDER_ITEM_COLUMNS
        ))
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    async fn insert_order(
        &self,
        order: NewOrder,
        items: Vec<NewOrderItem>,
    ) -> AppResult<OrderWithItems> {
        // Dropping the transaction on an early return rolls it back
        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            INSERT INTO orders (order_date, status, total_amount, supplier_id, user_id, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(order.order_date)
        .bind(order.status.as_str())
        .bind(order.total_amount)
        .bind(order.supplier_id)
        .bind(order.user_id)
        .bind(&order.notes)
        .fetch_one(&mut *tx)
        .await?;
        let created = Order::try_from(row)?;

        let item_sql = format!(
            r#"
            INSERT INTO order_items (order_id, product_id, quantity, unit_price, total_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ORDER_ITEM_COLUMNS
        );

        let mut created_items = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, OrderItemRow>(&item_sql)
                .bind(created.id)
                .bind(item.product_id)
                .bind(item.quantity)
                .bind(item.unit_price)
                .bind(item.total_price)
                .fetch_one(&mut *tx)
                .await?;
            created_items.push(OrderItem::from(row));
        }

        tx.commit().await?;

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
        sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            UPDATE orders
            SET status = $2, notes = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(&notes)
        .fetch_optional(&self.db)
        .await?
        .map(Order::try_from)
        .transpose()
    }

    async fn delete_order(&self, id: i32) -> AppResult<bool> {
        // order_items go with the order (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[axum::async_trait]
impl ShipmentRepository for PgStore {
    async fn list_shipments(&self) -> AppResult<Vec<Shipment>> {
        let rows = sqlx::query_as::<_, ShipmentRow>(&format!(
            "SELECT {} FROM shipments ORDER BY id",
            SHIPMENT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        convert_all(rows)
    }

    async fn find_shipment(&self, id: i32) -> AppResult<Option<Shipment>> {
        sqlx::query_as::<_, ShipmentRow>(&format!(
            "SELECT {} FROM shipments WHERE id = $1",
            SHIPMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .map(Shipment::try_from)
        .transpose()
    }

    async fn insert_shipment(&self, shipment: NewShipment) -> AppResult<Shipment> {
        let row = sqlx::query_as::<_, ShipmentRow>(&format!(
            r#"
            INSERT INTO shipments (order_id, tracking_number, status, carrier,
                                   estimated_delivery_date, actual_delivery_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            SHIPMENT_COLUMNS
        ))
        .bind(shipment.order_id)
        .bind(&shipment.tracking_number)
        .bind(shipment.status.as_str())
        .bind(&shipment.carrier)
        .bind(shipment.estimated_delivery_date)
        .bind(shipment.actual_delivery_date)
        .bind(&shipment.notes)
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    async fn save_shipment(&self, shipment: &Shipment) -> AppResult<Option<Shipment>> {
        sqlx::query_as::<_, ShipmentRow>(&format!(
            r#"
            UPDATE shipments
            SET tracking_number = $2, status = $3, carrier = $4,
                estimated_delivery_date = $5, actual_delivery_date = $6, notes = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SHIPMENT_COLUMNS
        ))
        .bind(shipment.id)
        .bind(&shipment.tracking_number)
        .bind(shipment.status.as_str())
        .bind(&shipment.carrier)
        .bind(shipment.estimated_delivery_date)
        .bind(shipment.actual_delivery_date)
        .bind(&shipment.notes)
        .fetch_optional(&self.db)
        .await?
        .map(Shipment::try_from)
        .transpose()
    }

    async fn delete_shipment(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM shipments WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[axum::async_trait]
impl UserRepository for PgStore {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY id",
            USER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        let records: Vec<UserRecord> = convert_all(rows)?;
        Ok(records.into_iter().map(|r| r.user).collect())
    }

    async fn find_user(&self, id: i32) -> AppResult<Option<UserRecord>> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .map(UserRecord::try_from)
            .transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .map(UserRecord::try_from)
        .transpose()
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (name, email, role, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    async fn update_user(&self, id: i32, user: NewUser) -> AppResult<Option<UserRecord>> {
        sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = $2, email = $3, role = $4, password_hash = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .fetch_optional(&self.db)
        .await?
        .map(UserRecord::try_from)
        .transpose()
    }

    async fn delete_user(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[axum::async_trait]
impl Store for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
