//! Product catalog handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::models::Product;

use super::MessageResponse;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::CurrentUser;
use crate::services::catalog::{CreateProductInput, UpdateProductInput};
use crate::services::CatalogService;
use crate::AppState;

/// List all products
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = CatalogService::new(state.store.clone());
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Products at or below their minimum stock level
pub async fn list_low_stock_products(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Product>>> {
    let service = CatalogService::new(state.store.clone());
    let products = service.low_stock_products().await?;
    Ok(Json(products))
}

/// Get a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Product>> {
    let service = CatalogService::new(state.store.clone());
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Create a new product
pub async fn create_product(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let service = CatalogService::new(state.store.clone());
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product (admin)
pub async fn update_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    AppJson(input): AppJson<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    tracing::debug!(actor = user.user_id, product_id = id, "admin product update");
    let service = CatalogService::new(state.store.clone());
    let product = service.update_product(id, input).await?;
    Ok(Json(product))
}

/// Delete a product (admin)
pub async fn delete_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    tracing::debug!(actor = user.user_id, product_id = id, "admin product delete");
    let service = CatalogService::new(state.store.clone());
    service.delete_product(id).await?;
    Ok(Json(MessageResponse::deleted("Product")))
}
