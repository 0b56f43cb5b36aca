//! Supplier handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::models::Supplier;

use super::MessageResponse;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::CurrentUser;
use crate::services::supplier::{CreateSupplierInput, UpdateSupplierInput};
use crate::services::SupplierService;
use crate::AppState;

pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.store.clone());
    Ok(Json(service.list_suppliers().await?))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.store.clone());
    Ok(Json(service.get_supplier(id).await?))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateSupplierInput>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    let service = SupplierService::new(state.store.clone());
    let supplier = service.create_supplier(input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn update_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    AppJson(input): AppJson<UpdateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    tracing::debug!(actor = user.user_id, supplier_id = id, "admin supplier update");
    let service = SupplierService::new(state.store.clone());
    Ok(Json(service.update_supplier(id, input).await?))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    tracing::debug!(actor = user.user_id, supplier_id = id, "admin supplier delete");
    let service = SupplierService::new(state.store.clone());
    service.delete_supplier(id).await?;
    Ok(Json(MessageResponse::deleted("Supplier")))
}
