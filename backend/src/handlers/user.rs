//! User administration handlers

use axum::{
    extract::{Path, State},
    Json,
};
use shared::models::User;

use super::MessageResponse;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::CurrentUser;
use crate::services::user::UpdateUserInput;
use crate::services::UserService;
use crate::AppState;

pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let service = UserService::new(state.store.clone(), &state.config);
    Ok(Json(service.list_users().await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    AppJson(input): AppJson<UpdateUserInput>,
) -> AppResult<Json<User>> {
    tracing::debug!(actor = user.user_id, user_id = id, "admin user update");
    let service = UserService::new(state.store.clone(), &state.config);
    Ok(Json(service.update_user(id, input).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    tracing::debug!(actor = user.user_id, user_id = id, "admin user delete");
    let service = UserService::new(state.store.clone(), &state.config);
    service.delete_user(id).await?;
    Ok(Json(MessageResponse::deleted("User")))
}
