//! Supplier management service

use serde::Deserialize;
use shared::models::{Supplier, SupplierStatus};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::repository::{DynStore, NewSupplier};
use crate::services::{check_email, check_required};

#[derive(Clone)]
pub struct SupplierService {
    store: DynStore,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct CreateSupplierInput {
    #[validate(custom = "check_required")]
    pub name: String,
    #[validate(custom = "check_required")]
    pub contact: String,
    #[validate(custom = "check_required")]
    pub address: String,
    #[validate(custom = "check_email")]
    pub email: String,
    pub status: Option<SupplierStatus>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateSupplierInput {
    #[validate(custom = "check_required")]
    pub name: Option<String>,
    #[validate(custom = "check_required")]
    pub contact: Option<String>,
    #[validate(custom = "check_required")]
    pub address: Option<String>,
    #[validate(custom = "check_email")]
    pub email: Option<String>,
    pub status: Option<SupplierStatus>,
}

impl SupplierService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        self.store.list_suppliers().await
    }

    pub async fn get_supplier(&self, id: i32) -> AppResult<Supplier> {
        self.store
            .find_supplier(id)
            .await?
            .ok_or_else(|| AppError::not_found("Supplier", id))
    }

    pub async fn create_supplier(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        input.validate()?;

        let created = self
            .store
            .insert_supplier(NewSupplier {
                name: input.name.trim().to_string(),
                contact: input.contact.trim().to_string(),
                address: input.address.trim().to_string(),
                email: input.email.trim().to_string(),
                status: input.status.unwrap_or_default(),
            })
            .await?;

        tracing::info!(supplier_id = created.id, "supplier created");
        Ok(created)
    }

    pub async fn update_supplier(&self, id: i32, input: UpdateSupplierInput) -> AppResult<Supplier> {
        input.validate()?;
        let existing = self.get_supplier(id).await?;

        let supplier = NewSupplier {
            name: input.name.map_or(existing.name, |v| v.trim().to_string()),
            contact: input.contact.map_or(existing.contact, |v| v.trim().to_string()),
            address: input.address.map_or(existing.address, |v| v.trim().to_string()),
            email: input.email.map_or(existing.email, |v| v.trim().to_string()),
            status: input.status.unwrap_or(existing.status),
        };

        self.store
            .update_supplier(id, supplier)
            .await?
            .ok_or_else(|| AppError::not_found("Supplier", id))
    }

    /// Fails with a conflict while products or orders still reference the supplier
    pub async fn delete_supplier(&self, id: i32) -> AppResult<()> {
        if !self.store.delete_supplier(id).await? {
            return Err(AppError::not_found("Supplier", id));
        }
        tracing::info!(supplier_id = id, "supplier deleted");
        Ok(())
    }
}
