//! Order placement service
//!
//! Placing an order snapshots each product's current price into its line,
//! computes the line totals and derives the order total from them. The order
//! and its lines are written in one atomic store call, so a failed placement
//! leaves nothing behind.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::{Order, OrderStatus, OrderWithItems};
use shared::pricing::{line_total, sum_money};
use shared::validation::validate_quantity;

use crate::error::{AppError, AppResult};
use crate::repository::{DynStore, NewOrder, NewOrderItem};
use crate::services::parse_field;

/// Order service for placing and managing orders
#[derive(Clone)]
pub struct OrderService {
    store: DynStore,
}

/// One requested line: a product and how many of it
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLineInput {
    #[serde(rename = "ProductID")]
    pub product_id: i32,
    #[serde(rename = "Quantity")]
    pub quantity: i32,
}

/// Input for placing an order
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlaceOrderInput {
    #[serde(rename = "SupplierID")]
    pub supplier_id: Option<i32>,
    #[serde(rename = "UserID")]
    pub user_id: Option<i32>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub order_date: Option<DateTime<Utc>>,
    /// Accepted for compatibility; the stored total is always recomputed
    pub total_amount: Option<Decimal>,
    #[serde(rename = "items", default)]
    pub items: Vec<OrderLineInput>,
}

/// Admin order update; only status and notes are mutable
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateOrderInput {
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl OrderService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// Place an order with price snapshots and server-derived totals
    pub async fn place_order(&self, input: PlaceOrderInput) -> AppResult<OrderWithItems> {
        if input.items.is_empty() {
            return Err(AppError::validation(
                "items",
                "Order must contain at least one item",
            ));
        }
        for line in &input.items {
            validate_quantity(line.quantity).map_err(|m| AppError::validation("Quantity", m))?;
        }
        if input.supplier_id.is_none() && input.user_id.is_none() {
            return Err(AppError::validation(
                "SupplierID",
                "Order requires a SupplierID or a UserID",
            ));
        }
        let status = match input.status.as_deref() {
            Some(raw) => parse_field::<OrderStatus>("Status", raw)?,
            None => OrderStatus::default(),
        };

        if let Some(supplier_id) = input.supplier_id {
            if self.store.find_supplier(supplier_id).await?.is_none() {
                return Err(AppError::not_found("Supplier", supplier_id));
            }
        }
        if let Some(user_id) = input.user_id {
            if self.store.find_user(user_id).await?.is_none() {
                return Err(AppError::not_found("User", user_id));
            }
        }

        // Resolve every line before writing anything
        let mut lines = Vec::with_capacity(input.items.len());
        for line in &input.items {
            let product = self
                .store
                .find_product(line.product_id)
                .await?
                .ok_or_else(|| AppError::not_found("Product", line.product_id))?;

            let total_price = line_total(product.price, line.quantity).ok_or_else(|| {
                AppError::validation("Quantity", "Line total exceeds 99999999.99")
            })?;

            lines.push(NewOrderItem {
                product_id: product.id,
                quantity: line.quantity,
                unit_price: product.price,
                total_price,
            });
        }

        let total_amount = sum_money(lines.iter().map(|l| l.total_price)).ok_or_else(|| {
            AppError::validation("Quantity", "Order total exceeds 99999999.99")
        })?;
        if let Some(claimed) = input.total_amount {
            if claimed != total_amount {
                tracing::warn!(
                    claimed = %claimed,
                    computed = %total_amount,
                    "ignoring client-supplied order total"
                );
            }
        }

        let order = NewOrder {
            order_date: input.order_date.unwrap_or_else(Utc::now),
            status,
            total_amount,
            supplier_id: input.supplier_id,
            user_id: input.user_id,
            notes: input.notes,
        };

        let placed = self.store.insert_order(order, lines).await?;
        tracing::info!(
            order_id = placed.order.id,
            lines = placed.items.len(),
            total = %placed.order.total_amount,
            "order placed"
        );
        Ok(placed)
    }

    /// All orders, newest first
    pub async fn list_orders(&self) -> AppResult<Vec<Order>> {
        self.store.list_orders().await
    }

    pub async fn get_order(&self, id: i32) -> AppResult<OrderWithItems> {
        let order = self
            .store
            .find_order(id)
            .await?
            .ok_or_else(|| AppError::not_found("Order", id))?;
        let items = self.store.order_items(id).await?;
        Ok(OrderWithItems { order, items })
    }

    pub async fn update_order(&self, id: i32, input: UpdateOrderInput) -> AppResult<Order> {
        let existing = self
            .store
            .find_order(id)
            .await?
            .ok_or_else(|| AppError::not_found("Order", id))?;

        let status = match input.status.as_deref() {
            Some(raw) => parse_field::<OrderStatus>("Status", raw)?,
            None => existing.status,
        };
        let notes = input.notes.or(existing.notes);

        let updated = self
            .store
            .update_order(id, status, notes)
            .await?
            .ok_or_else(|| AppError::not_found("Order", id))?;

        if updated.status != existing.status {
            tracing::info!(order_id = id, from = %existing.status, to = %updated.status, "order status changed");
        }
        Ok(updated)
    }

    /// Delete an order together with its lines
    pub async fn delete_order(&self, id: i32) -> AppResult<()> {
        if !self.store.delete_order(id).await? {
            return Err(AppError::not_found("Order", id));
        }
        tracing::info!(order_id = id, "order deleted");
        Ok(())
    }
}
