//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default reorder threshold for new products
pub const DEFAULT_MIN_STOCK_LEVEL: i32 = 10;

/// A product in the catalog
///
/// `price` is the live list price. Orders copy it into their line items
/// when placed, so later edits never reach existing orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    #[serde(rename = "ProductID")]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: Decimal,
    pub stock: i32,
    pub min_stock_level: i32,
    #[serde(rename = "SupplierID")]
    pub supplier_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.stock, self.min_stock_level)
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock_level
    }
}

/// Stock badge shown on inventory views
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StockStatus {
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "In Stock")]
    InStock,
}

impl StockStatus {
    pub fn classify(stock: i32, min_stock_level: i32) -> Self {
        if stock <= 0 {
            StockStatus::OutOfStock
        } else if stock <= min_stock_level {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::InStock => "In Stock",
        }
    }
}
