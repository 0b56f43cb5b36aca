//! Shipment tracking models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UnknownVariant;

/// Shipment status: Preparing -> In Transit -> Delivered, or Cancelled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ShipmentStatus {
    #[default]
    Preparing,
    #[serde(rename = "In Transit")]
    InTransit,
    Delivered,
    Cancelled,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Preparing => "Preparing",
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether entering this status stamps the actual delivery date
    pub fn stamps_delivery(&self) -> bool {
        matches!(self, ShipmentStatus::Delivered)
    }
}

impl FromStr for ShipmentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Preparing" => Ok(ShipmentStatus::Preparing),
            "In Transit" => Ok(ShipmentStatus::InTransit),
            "Delivered" => Ok(ShipmentStatus::Delivered),
            "Cancelled" => Ok(ShipmentStatus::Cancelled),
            _ => Err(UnknownVariant::new("shipment status", s)),
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shipment for an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Shipment {
    #[serde(rename = "ShipmentID")]
    pub id: i32,
    #[serde(rename = "OrderID")]
    pub order_id: i32,
    pub tracking_number: String,
    pub status: ShipmentStatus,
    pub carrier: String,
    pub estimated_delivery_date: Option<DateTime<Utc>>,
    /// Set when the shipment is marked delivered
    pub actual_delivery_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shipment {
    /// Apply a status change, stamping the delivery time on `Delivered`.
    /// Any other status leaves the actual delivery date untouched.
    pub fn apply_status(&mut self, status: ShipmentStatus, now: DateTime<Utc>) {
        self.status = status;
        if status.stamps_delivery() {
            self.actual_delivery_date = Some(now);
        }
    }
}
