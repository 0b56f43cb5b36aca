//! Error handling for the Supply Chain Management Platform
//!
//! Every failure is returned to the caller in the same request as a JSON body
//! `{ message, code, field? }`. Server-side causes are logged and never echoed.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {message}")]
    Conflict { resource: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[source] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: i32) -> Self {
        AppError::NotFound(format!("{} {}", resource, id))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::TokenExpired
            | AppError::InvalidToken
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AppError::Validation { .. }
            | AppError::ValidationError(_)
            | AppError::DuplicateEntry(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Configuration(_)
            | AppError::DatabaseError(_)
            | AppError::Internal(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default();
            match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => {
                    return AppError::DuplicateEntry(constraint_field(constraint).to_string());
                }
                // numeric_value_out_of_range
                Some("22003") => {
                    return AppError::ValidationError("Numeric value out of range".to_string());
                }
                // foreign_key_violation
                Some("23503") => {
                    return AppError::Conflict {
                        resource: constraint.to_string(),
                        message: "Record is still referenced by other records".to_string(),
                    };
                }
                _ => {}
            }
        }
        AppError::DatabaseError(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Field order in ValidationErrors is unspecified; report the first by name
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("{} is invalid", field));
                AppError::validation(field, message)
            }
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

/// Map a unique constraint name to the wire field it guards
fn constraint_field(constraint: &str) -> &str {
    match constraint {
        "users_email_key" => "Email",
        "shipments_tracking_number_key" => "TrackingNumber",
        "" => "value",
        other => other,
    }
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorResponse {
    fn new(code: &str, message: impl Into<String>, field: Option<String>) -> Self {
        Self {
            message: message.into(),
            code: code.to_string(),
            field,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AppError::InvalidCredentials => {
                ErrorResponse::new("INVALID_CREDENTIALS", "Invalid credentials", None)
            }
            AppError::TokenExpired => ErrorResponse::new("TOKEN_EXPIRED", "Token has expired", None),
            AppError::InvalidToken => ErrorResponse::new("INVALID_TOKEN", "Invalid token", None),
            AppError::Unauthorized(message) => {
                ErrorResponse::new("UNAUTHORIZED", message.clone(), None)
            }
            AppError::InsufficientPermissions => {
                ErrorResponse::new("FORBIDDEN", "Access denied", None)
            }
            AppError::Validation { field, message } => {
                ErrorResponse::new("VALIDATION_ERROR", message.clone(), Some(field.clone()))
            }
            AppError::ValidationError(message) => {
                ErrorResponse::new("VALIDATION_ERROR", message.clone(), None)
            }
            AppError::DuplicateEntry(field) => ErrorResponse::new(
                "DUPLICATE_ENTRY",
                format!("A record with this {} already exists", field),
                Some(field.clone()),
            ),
            AppError::NotFound(resource) => {
                ErrorResponse::new("NOT_FOUND", format!("{} not found", resource), None)
            }
            AppError::Conflict { resource, message } => {
                ErrorResponse::new("CONFLICT", message.clone(), Some(resource.clone()))
            }
            AppError::Configuration(_)
            | AppError::DatabaseError(_)
            | AppError::Internal(_)
            | AppError::InternalError(_) => {
                ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred", None)
            }
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
