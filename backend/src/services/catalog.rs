//! Product catalog service

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::{Product, DEFAULT_MIN_STOCK_LEVEL};
use shared::pricing::round_money;
use shared::validation::validate_stock;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::repository::{DynStore, NewProduct};
use crate::services::{check_price, check_required};

/// Catalog service for managing products
#[derive(Clone)]
pub struct CatalogService {
    store: DynStore,
}

/// Input for creating a product
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct CreateProductInput {
    #[validate(custom = "check_required")]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom = "check_required")]
    pub category: String,
    #[validate(custom = "check_price")]
    pub price: Decimal,
    #[serde(default)]
    pub stock: i32,
    pub min_stock_level: Option<i32>,
    #[serde(rename = "SupplierID")]
    pub supplier_id: i32,
}

/// Partial product update; absent fields keep their value
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateProductInput {
    #[validate(custom = "check_required")]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom = "check_required")]
    pub category: Option<String>,
    #[validate(custom = "check_price")]
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub min_stock_level: Option<i32>,
    #[serde(rename = "SupplierID")]
    pub supplier_id: Option<i32>,
}

fn check_levels(product: &NewProduct) -> AppResult<()> {
    validate_stock(product.stock).map_err(|m| AppError::validation("Stock", m))?;
    validate_stock(product.min_stock_level)
        .map_err(|m| AppError::validation("MinStockLevel", m))?;
    Ok(())
}

impl CatalogService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        self.store.list_products().await
    }

    /// Products at or below their reorder threshold
    pub async fn low_stock_products(&self) -> AppResult<Vec<Product>> {
        let products = self.store.list_products().await?;
        Ok(products.into_iter().filter(Product::is_low_stock).collect())
    }

    pub async fn get_product(&self, id: i32) -> AppResult<Product> {
        self.store
            .find_product(id)
            .await?
            .ok_or_else(|| AppError::not_found("Product", id))
    }

    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        input.validate()?;

        let product = NewProduct {
            name: input.name.trim().to_string(),
            description: input.description,
            category: input.category.trim().to_string(),
            price: round_money(input.price),
            stock: input.stock,
            min_stock_level: input.min_stock_level.unwrap_or(DEFAULT_MIN_STOCK_LEVEL),
            supplier_id: input.supplier_id,
        };
        check_levels(&product)?;
        self.ensure_supplier(product.supplier_id).await?;

        let created = self.store.insert_product(product).await?;
        tracing::info!(product_id = created.id, price = %created.price, "product created");
        Ok(created)
    }

    pub async fn update_product(&self, id: i32, input: UpdateProductInput) -> AppResult<Product> {
        input.validate()?;
        let existing = self.get_product(id).await?;

        let product = NewProduct {
            name: input.name.map_or(existing.name, |n| n.trim().to_string()),
            description: input.description.or(existing.description),
            category: input.category.map_or(existing.category, |c| c.trim().to_string()),
            price: input.price.map_or(existing.price, round_money),
            stock: input.stock.unwrap_or(existing.stock),
            min_stock_level: input.min_stock_level.unwrap_or(existing.min_stock_level),
            supplier_id: input.supplier_id.unwrap_or(existing.supplier_id),
        };
        check_levels(&product)?;
        if product.supplier_id != existing.supplier_id {
            self.ensure_supplier(product.supplier_id).await?;
        }

        // Existing order lines keep their snapshot; only the list price moves
        let updated = self
            .store
            .update_product(id, product)
            .await?
            .ok_or_else(|| AppError::not_found("Product", id))?;

        if updated.price != existing.price {
            tracing::info!(
                product_id = id,
                old_price = %existing.price,
                new_price = %updated.price,
                "product price changed"
            );
        }
        Ok(updated)
    }

    pub async fn delete_product(&self, id: i32) -> AppResult<()> {
        if !self.store.delete_product(id).await? {
            return Err(AppError::not_found("Product", id));
        }
        tracing::info!(product_id = id, "product deleted");
        Ok(())
    }

    async fn ensure_supplier(&self, supplier_id: i32) -> AppResult<()> {
        self.store
            .find_supplier(supplier_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Supplier", supplier_id))
    }
}
