//! Common types used across the platform

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Raised when a status or role string does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// User roles
///
/// Older records carry lowercase spellings (`manufacturer`, `consumer`).
/// Parsing is case-insensitive and always yields the PascalCase variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Manufacturer,
    Consumer,
    Supplier,
    WarehouseManager,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Manufacturer,
        Role::Consumer,
        Role::Supplier,
        Role::WarehouseManager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manufacturer => "Manufacturer",
            Role::Consumer => "Consumer",
            Role::Supplier => "Supplier",
            Role::WarehouseManager => "WarehouseManager",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownVariant::new("role", s))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_canonical() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_parse_legacy_lowercase() {
        assert_eq!("manufacturer".parse::<Role>().unwrap(), Role::Manufacturer);
        assert_eq!("consumer".parse::<Role>().unwrap(), Role::Consumer);
        assert_eq!(" ADMIN ".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(
            "warehousemanager".parse::<Role>().unwrap(),
            Role::WarehouseManager
        );
    }

    #[test]
    fn test_role_parse_unknown() {
        let err = "superuser".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "unknown role 'superuser'");
    }

    #[test]
    fn test_role_serde_normalizes() {
        let role: Role = serde_json::from_str("\"consumer\"").unwrap();
        assert_eq!(role, Role::Consumer);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"Consumer\"");
    }
}
