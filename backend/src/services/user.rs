//! User administration service

use serde::Deserialize;
use shared::models::User;
use shared::types::Role;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::repository::{DynStore, NewUser};
use crate::services::auth::hash_password;
use crate::services::{check_email, check_password, check_required};

#[derive(Clone)]
pub struct UserService {
    store: DynStore,
    bcrypt_cost: u32,
}

/// Admin user update; a new password is re-hashed before storage
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateUserInput {
    #[validate(custom = "check_required")]
    pub name: Option<String>,
    #[validate(custom = "check_email")]
    pub email: Option<String>,
    pub role: Option<Role>,
    #[validate(custom = "check_password")]
    pub password: Option<String>,
}

impl UserService {
    pub fn new(store: DynStore, config: &Config) -> Self {
        Self {
            store,
            bcrypt_cost: config.auth.bcrypt_cost,
        }
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.store.list_users().await
    }

    pub async fn update_user(&self, id: i32, input: UpdateUserInput) -> AppResult<User> {
        input.validate()?;
        let existing = self
            .store
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))?;

        let password_hash = match input.password.as_deref() {
            Some(password) => hash_password(password, self.bcrypt_cost)?,
            None => existing.password_hash,
        };

        let user = NewUser {
            name: input.name.map_or(existing.user.name, |v| v.trim().to_string()),
            email: input.email.map_or(existing.user.email, |v| v.trim().to_string()),
            role: input.role.unwrap_or(existing.user.role),
            password_hash,
        };

        let updated = self
            .store
            .update_user(id, user)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))?;

        tracing::info!(user_id = id, role = %updated.user.role, "user updated");
        Ok(updated.user)
    }

    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        if !self.store.delete_user(id).await? {
            return Err(AppError::not_found("User", id));
        }
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }
}
