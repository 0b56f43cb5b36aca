//! WebAssembly module for the Supply Chain Management Platform
//!
//! Provides client-side computation for:
//! - Order line and basket total previews
//! - Stock status badges
//! - Role-scoped navigation menus
//! - Form-level validation

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::navigation::*;
pub use shared::pricing::*;
pub use shared::types::*;
pub use shared::validation::*;

/// A basket line as built by the order form
#[derive(Debug, Deserialize)]
struct BasketLine {
    #[serde(alias = "price", alias = "UnitPrice")]
    unit_price: Decimal,
    #[serde(alias = "Quantity")]
    quantity: i32,
}

/// Calculate a line total from a decimal price string and quantity
#[wasm_bindgen]
pub fn calculate_line_total(unit_price: &str, quantity: i32) -> Result<String, JsValue> {
    let price = Decimal::from_str(unit_price)
        .map_err(|e| JsValue::from_str(&format!("Invalid price: {}", e)))?;
    line_total(price, quantity)
        .map(|total| total.to_string())
        .ok_or_else(|| JsValue::from_str("Line total exceeds 99999999.99"))
}

/// Calculate a basket total from a JSON array of `{ unit_price, quantity }`
#[wasm_bindgen]
pub fn calculate_order_total(lines_json: &str) -> Result<String, JsValue> {
    let lines: Vec<BasketLine> = serde_json::from_str(lines_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid basket JSON: {}", e)))?;

    order_total(lines.into_iter().map(|l| (l.unit_price, l.quantity)))
        .map(|total| total.to_string())
        .ok_or_else(|| JsValue::from_str("Order total exceeds 99999999.99"))
}

/// Stock badge label for an inventory row
#[wasm_bindgen]
pub fn classify_stock(stock: i32, min_stock_level: i32) -> String {
    StockStatus::classify(stock, min_stock_level).label().to_string()
}

/// Canonical role name, or an empty string for unknown roles
#[wasm_bindgen]
pub fn normalize_role(role: &str) -> String {
    role.parse::<Role>()
        .map(|r| r.as_str().to_string())
        .unwrap_or_default()
}

/// Sidebar menu for a role as a JSON array of `{ text, path }`
#[wasm_bindgen]
pub fn menu_for_role_json(role: &str) -> String {
    let items = menu_for_role(role.parse::<Role>().ok());
    serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string())
}

/// Check an email address before submitting a form
#[wasm_bindgen]
pub fn validate_email_address(email: &str) -> bool {
    validate_email(email).is_ok()
}

/// Check a line quantity before adding it to the basket
#[wasm_bindgen]
pub fn validate_line_quantity(quantity: i32) -> bool {
    validate_quantity(quantity).is_ok()
}
