//! Authentication middleware
//!
//! Bearer token authentication and admin-only access control

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use shared::types::Role;

use crate::error::AppError;
use crate::services::AuthService;
use crate::AppState;

/// Authenticated user information extracted from the token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i32,
    pub role: Role,
    pub email: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Authentication middleware that validates bearer tokens
///
/// The token's subject must still name an existing user; the role is taken
/// from the stored user so a role change applies without re-login.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) =
        bearer.ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))?;

    let auth_service = AuthService::new(state.store.clone(), &state.config);
    let claims = auth_service.decode_token(bearer.token())?;

    let user_id: i32 = claims.sub.parse().map_err(|_| AppError::InvalidToken)?;
    let record = state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    request.extensions_mut().insert(AuthUser {
        user_id: record.user.id,
        role: record.user.role,
        email: record.user.email,
    });

    Ok(next.run(request).await)
}

/// Reject authenticated users without the Admin role
///
/// Must be layered inside `auth_middleware`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    if !user.is_admin() {
        tracing::debug!(user_id = user.user_id, role = %user.role, "admin route denied");
        return Err(AppError::InsufficientPermissions);
    }

    Ok(next.run(request).await)
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
