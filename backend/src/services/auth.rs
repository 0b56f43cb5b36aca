//! Authentication service for user registration, login, and token management

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use shared::models::User;
use shared::types::Role;
use validator::Validate;

use crate::config::{BootstrapConfig, Config};
use crate::error::{AppError, AppResult};
use crate::repository::{DynStore, NewUser};
use crate::services::{check_email, check_password, check_required};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: DynStore,
    jwt_secret: String,
    token_expiry: i64,
    bcrypt_cost: u32,
}

/// Input for registering a new account
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterInput {
    #[validate(custom = "check_required")]
    pub name: String,
    #[validate(custom = "check_email")]
    pub email: String,
    #[validate(custom = "check_password")]
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Response for register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// Hash a password with the configured bcrypt cost
pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    hash(password, cost).map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(store: DynStore, config: &Config) -> Self {
        Self {
            store,
            jwt_secret: config.auth.jwt_secret.clone(),
            token_expiry: config.auth.token_expiry,
            bcrypt_cost: config.auth.bcrypt_cost,
        }
    }

    /// Register a new user and sign them in
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthResponse> {
        input.validate()?;

        let email = input.email.trim().to_string();
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::validation("Email", "User already exists"));
        }

        let password_hash = hash_password(&input.password, self.bcrypt_cost)?;
        let record = self
            .store
            .insert_user(NewUser {
                name: input.name.trim().to_string(),
                email,
                role: input.role,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = record.user.id, role = %record.user.role, "user registered");

        let token = self.issue_token(&record.user)?;
        Ok(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            user: record.user,
        })
    }

    /// Authenticate user with email and password
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthResponse> {
        // Unknown email and wrong password are indistinguishable to the caller
        let record = self
            .store
            .find_user_by_email(input.email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(&input.password, &record.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            tracing::debug!(user_id = record.user.id, "login rejected");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issue_token(&record.user)?;
        Ok(AuthResponse {
            message: "Login successful".to_string(),
            token,
            user: record.user,
        })
    }

    /// Sign an access token for a user
    pub fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            exp: (now + Duration::seconds(self.token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Validate access token and return claims
    pub fn decode_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })
    }

    /// Create the bootstrap admin account unless its email is already taken
    pub async fn ensure_default_admin(&self, bootstrap: &BootstrapConfig) -> AppResult<Option<User>> {
        if self
            .store
            .find_user_by_email(&bootstrap.admin_email)
            .await?
            .is_some()
        {
            tracing::debug!(email = %bootstrap.admin_email, "default admin already present");
            return Ok(None);
        }

        let password_hash = hash_password(&bootstrap.admin_password, self.bcrypt_cost)?;
        let record = self
            .store
            .insert_user(NewUser {
                name: bootstrap.admin_name.clone(),
                email: bootstrap.admin_email.clone(),
                role: Role::Admin,
                password_hash,
            })
            .await?;

        tracing::info!(email = %record.user.email, "default admin user created");
        Ok(Some(record.user))
    }
}
