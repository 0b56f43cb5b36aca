//! Domain models for the Supply Chain Management Platform

mod order;
mod product;
mod shipment;
mod supplier;
mod user;

pub use order::*;
pub use product::*;
pub use shipment::*;
pub use supplier::*;
pub use user::*;
