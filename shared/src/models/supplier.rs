//! Supplier models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UnknownVariant;

/// A supplier providing products and receiving purchase orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Supplier {
    #[serde(rename = "SupplierID")]
    pub id: i32,
    pub name: String,
    pub contact: String,
    pub address: String,
    pub email: String,
    pub status: SupplierStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SupplierStatus {
    #[default]
    Active,
    Inactive,
}

impl SupplierStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierStatus::Active => "Active",
            SupplierStatus::Inactive => "Inactive",
        }
    }
}

impl FromStr for SupplierStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(SupplierStatus::Active),
            "Inactive" => Ok(SupplierStatus::Inactive),
            _ => Err(UnknownVariant::new("supplier status", s)),
        }
    }
}

impl fmt::Display for SupplierStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
