//! Order and order line models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::UnknownVariant;

/// Order lifecycle status
///
/// Moves forward in practice, but no transition table is enforced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Processing" => Ok(OrderStatus::Processing),
            "Shipped" => Ok(OrderStatus::Shipped),
            "Delivered" => Ok(OrderStatus::Delivered),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(UnknownVariant::new("order status", s)),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchase order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Order {
    #[serde(rename = "OrderID")]
    pub id: i32,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    /// Sum of the order's line totals
    pub total_amount: Decimal,
    #[serde(rename = "SupplierID")]
    pub supplier_id: Option<i32>,
    #[serde(rename = "UserID")]
    pub user_id: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single order line with its price snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct OrderItem {
    #[serde(rename = "OrderItemID")]
    pub id: i32,
    #[serde(rename = "OrderID")]
    pub order_id: i32,
    #[serde(rename = "ProductID")]
    pub product_id: i32,
    pub quantity: i32,
    /// Product price at the moment the order was placed
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// An order together with its lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    #[serde(rename = "OrderItems")]
    pub items: Vec<OrderItem>,
}

impl OrderWithItems {
    /// Sum of line totals as stored
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(|item| item.total_price).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_round_trip_names() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_order_status_is_case_sensitive() {
        assert!("pending".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_serializes_with_wire_names() {
        let now = Utc::now();
        let order = Order {
            id: 7,
            order_date: now,
            status: OrderStatus::Pending,
            total_amount: Decimal::new(3000, 2),
            supplier_id: Some(1),
            user_id: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["OrderID"], 7);
        assert_eq!(json["SupplierID"], 1);
        assert_eq!(json["Status"], "Pending");
        assert!(json.get("TotalAmount").is_some());
    }
}
