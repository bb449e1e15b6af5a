//! Admin user management.

use std::sync::Arc;

use tracing::info;

use keygate_auth::password::{PasswordHasher, PasswordValidator};
use keygate_core::error::AppError;
use keygate_core::result::AppResult;
use keygate_core::types::UserId;
use keygate_database::store::UserStore;
use keygate_entity::user::{User, UserRole, UserUpdate};

use crate::context::RequestContext;
use crate::key::require_admin;

/// Admin-editable fields of an account.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    /// New username.
    pub username: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New plaintext password; hashed before storage.
    pub password: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
    /// Activate or suspend.
    pub is_active: Option<bool>,
}

/// Lists, edits and deletes accounts.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
        }
    }

    /// Every account, newest first.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<User>> {
        require_admin(ctx)?;
        self.users.list_all().await
    }

    /// Apply edits to an account.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: UserId,
        changes: UserChanges,
    ) -> AppResult<User> {
        require_admin(ctx)?;

        if let Some(email) = changes.email.as_deref() {
            if let Some(existing) = self.users.find_by_email(email).await? {
                if existing.id != id {
                    return Err(AppError::conflict("Email already in use"));
                }
            }
        }
        let password_hash = match changes.password.as_deref() {
            Some(password) => {
                self.validator.validate(password)?;
                Some(self.hasher.hash_password(password)?)
            }
            None => None,
        };

        let update = UserUpdate {
            username: changes.username,
            email: changes.email,
            password_hash,
            role: changes.role,
            is_active: changes.is_active,
        };
        let user = self
            .users
            .update(id, update)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user_id = %id, actor = %ctx.user_id, "User updated");
        Ok(user)
    }

    /// Delete an account. Admins cannot delete themselves.
    pub async fn delete(&self, ctx: &RequestContext, id: UserId) -> AppResult<()> {
        require_admin(ctx)?;
        if ctx.user_id == id {
            return Err(AppError::validation("Cannot delete your own account"));
        }
        if !self.users.delete(id).await? {
            return Err(AppError::not_found("User not found"));
        }
        info!(user_id = %id, actor = %ctx.user_id, "User deleted");
        Ok(())
    }
}
