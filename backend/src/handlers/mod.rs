//! HTTP request handlers

mod auth;
mod health;
mod order;
mod product;
mod shipment;
mod supplier;
mod user;

use serde::Serialize;

pub use auth::*;
pub use health::*;
pub use order::*;
pub use product::*;
pub use shipment::*;
pub use supplier::*;
pub use user::*;

/// Body returned by delete endpoints
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn deleted(resource: &str) -> Self {
        Self {
            message: format!("{} deleted successfully", resource),
        }
    }
}
