//! Shipment handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::models::Shipment;

use super::MessageResponse;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::CurrentUser;
use crate::services::shipment::{CreateShipmentInput, UpdateShipmentInput, UpdateStatusInput};
use crate::services::ShipmentService;
use crate::AppState;

pub async fn list_shipments(State(state): State<AppState>) -> AppResult<Json<Vec<Shipment>>> {
    let service = ShipmentService::new(state.store.clone());
    Ok(Json(service.list_shipments().await?))
}

pub async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Shipment>> {
    let service = ShipmentService::new(state.store.clone());
    Ok(Json(service.get_shipment(id).await?))
}

pub async fn create_shipment(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateShipmentInput>,
) -> AppResult<(StatusCode, Json<Shipment>)> {
    let service = ShipmentService::new(state.store.clone());
    let shipment = service.create_shipment(input).await?;
    Ok((StatusCode::CREATED, Json(shipment)))
}

/// Update shipment status: `{ "status": "Delivered" }`
pub async fn update_shipment_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(input): AppJson<UpdateStatusInput>,
) -> AppResult<Json<Shipment>> {
    let service = ShipmentService::new(state.store.clone());
    Ok(Json(service.update_status(id, &input.status).await?))
}

pub async fn update_shipment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    AppJson(input): AppJson<UpdateShipmentInput>,
) -> AppResult<Json<Shipment>> {
    tracing::debug!(actor = user.user_id, shipment_id = id, "admin shipment update");
    let service = ShipmentService::new(state.store.clone());
    Ok(Json(service.update_shipment(id, input).await?))
}

pub async fn delete_shipment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    tracing::debug!(actor = user.user_id, shipment_id = id, "admin shipment delete");
    let service = ShipmentService::new(state.store.clone());
    service.delete_shipment(id).await?;
    Ok(Json(MessageResponse::deleted("Shipment")))
}
