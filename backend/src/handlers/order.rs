//! Order handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::models::{Order, OrderWithItems};

use super::MessageResponse;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::CurrentUser;
use crate::services::order::{PlaceOrderInput, UpdateOrderInput};
use crate::services::OrderService;
use crate::AppState;

/// List all orders, newest first
pub async fn list_orders(State(state): State<AppState>) -> AppResult<Json<Vec<Order>>> {
    let service = OrderService::new(state.store.clone());
    Ok(Json(service.list_orders().await?))
}

/// Get an order with its items
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<OrderWithItems>> {
    let service = OrderService::new(state.store.clone());
    Ok(Json(service.get_order(id).await?))
}

/// Place an order
///
/// Returns the created order together with its priced lines.
pub async fn place_order(
    State(state): State<AppState>,
    AppJson(input): AppJson<PlaceOrderInput>,
) -> AppResult<(StatusCode, Json<OrderWithItems>)> {
    let service = OrderService::new(state.store.clone());
    let order = service.place_order(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    AppJson(input): AppJson<UpdateOrderInput>,
) -> AppResult<Json<Order>> {
    tracing::debug!(actor = user.user_id, order_id = id, "admin order update");
    let service = OrderService::new(state.store.clone());
    Ok(Json(service.update_order(id, input).await?))
}

pub async fn delete_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    tracing::debug!(actor = user.user_id, order_id = id, "admin order delete");
    let service = OrderService::new(state.store.clone());
    service.delete_order(id).await?;
    Ok(Json(MessageResponse::deleted("Order")))
}
