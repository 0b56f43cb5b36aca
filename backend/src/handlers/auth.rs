//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::services::auth::{AuthResponse, LoginInput, RegisterInput};
use crate::services::AuthService;
use crate::AppState;

/// Register endpoint handler
pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterInput>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let auth_service = AuthService::new(state.store.clone(), &state.config);
    let response = auth_service.register(body).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginInput>,
) -> Result<Json<AuthResponse>, AppError> {
    let auth_service = AuthService::new(state.store.clone(), &state.config);
    let response = auth_service.login(body).await?;

    Ok(Json(response))
}
