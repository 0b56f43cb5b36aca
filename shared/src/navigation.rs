//! Role-scoped navigation for the dashboard shell

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// A sidebar entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuItem {
    pub text: String,
    pub path: String,
}

impl MenuItem {
    fn new(text: &str, path: &str) -> Self {
        Self {
            text: text.to_string(),
            path: path.to_string(),
        }
    }
}

/// Menu entries visible to a role: Dashboard first, then role-specific pages.
/// Roles without a dedicated dashboard only see Dashboard.
pub fn menu_for_role(role: Option<Role>) -> Vec<MenuItem> {
    let mut items = vec![MenuItem::new("Dashboard", "/dashboard")];

    let role_items: &[(&str, &str)] = match role {
        Some(Role::Admin) => &[
            ("Suppliers", "/suppliers"),
            ("Products", "/products"),
            ("Orders", "/orders"),
            ("Shipments", "/shipments"),
            ("Admin", "/admin"),
        ],
        Some(Role::Manufacturer) => &[
            ("Products", "/products"),
            ("Orders", "/orders"),
            ("Shipments", "/shipments"),
        ],
        Some(Role::Consumer) => &[("Products", "/products"), ("Orders", "/orders")],
        _ => &[],
    };

    items.extend(role_items.iter().map(|(text, path)| MenuItem::new(text, path)));
    items
}
