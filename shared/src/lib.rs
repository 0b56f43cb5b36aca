//! Shared types and models for the Supply Chain Management Platform
//!
//! This crate contains types shared between the backend, the browser client
//! (via WASM), and other components of the system.

pub mod models;
pub mod navigation;
pub mod pricing;
pub mod types;
pub mod validation;

pub use models::*;
pub use navigation::*;
pub use pricing::*;
pub use types::*;
pub use validation::*;
