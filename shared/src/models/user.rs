//! User account models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Role;

/// A platform user. The password hash never leaves the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(rename = "UserID")]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
