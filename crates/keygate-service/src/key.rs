//! License key management for the administrative surface.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use keygate_auth::license::generate_license_secret;
use keygate_core::error::AppError;
use keygate_core::result::AppResult;
use keygate_core::types::{KeyId, UserId};
use keygate_database::store::KeyStore;
use keygate_entity::key::{CreateLicenseKey, KeyStatus, KeyType, KeyUpdate, LicenseKey};

use crate::admission::KeyLockRegistry;
use crate::context::RequestContext;

/// Input for issuing a key.
#[derive(Debug, Clone)]
pub struct NewKey {
    /// Display name.
    pub key_name: String,
    /// Tier; decides the expiry.
    pub key_type: KeyType,
    /// Defaults to 1.
    pub max_users: Option<i32>,
    /// Defaults to active.
    pub status: Option<KeyStatus>,
}

/// Admin-editable fields of a key.
#[derive(Debug, Clone, Default)]
pub struct KeyChanges {
    /// New display name.
    pub key_name: Option<String>,
    /// New tier. Does not recompute the expiry.
    pub key_type: Option<KeyType>,
    /// New status; setting `active` revives an expired key.
    pub status: Option<KeyStatus>,
    /// New cap.
    pub max_users: Option<i32>,
    /// `Some(None)` makes the key perpetual.
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

/// Issues, lists, edits and deletes license keys.
#[derive(Debug, Clone)]
pub struct KeyService {
    keys: Arc<dyn KeyStore>,
    locks: KeyLockRegistry,
}

impl KeyService {
    /// Creates a new key service.
    pub fn new(keys: Arc<dyn KeyStore>, locks: KeyLockRegistry) -> Self {
        Self { keys, locks }
    }

    /// Admins see every key; other accounts see the keys they issued.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<LicenseKey>> {
        if ctx.is_admin() {
            self.keys.list_all().await
        } else {
            self.keys.list_by_owner(ctx.user_id).await
        }
    }

    /// Issue a key owned by the caller with a fresh random secret.
    pub async fn create(&self, ctx: &RequestContext, input: NewKey) -> AppResult<LicenseKey> {
        self.issue(Some(ctx.user_id), input).await
    }

    /// Issue a key with an explicit owner. Used by the CLI, where keys may
    /// have no owning account.
    pub async fn issue(&self, owner_id: Option<UserId>, input: NewKey) -> AppResult<LicenseKey> {
        let key_name = input.key_name.trim().to_string();
        if key_name.is_empty() {
            return Err(AppError::validation("Missing required fields"));
        }
        let max_users = input.max_users.unwrap_or(1);
        validate_max_users(max_users)?;

        let key = self
            .keys
            .create(CreateLicenseKey {
                secret: generate_license_secret(),
                key_name,
                key_type: input.key_type,
                status: input.status.unwrap_or_default(),
                max_users,
                expires_at: input.key_type.expiry_from(Utc::now()),
                owner_id,
            })
            .await?;

        info!(
            key_id = %key.id,
            key_type = %key.key_type,
            max_users = key.max_users,
            owner = ?owner_id,
            "License key issued"
        );
        Ok(key)
    }

    /// Apply admin edits atomically.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: KeyId,
        changes: KeyChanges,
    ) -> AppResult<LicenseKey> {
        require_admin(ctx)?;
        if let Some(max_users) = changes.max_users {
            validate_max_users(max_users)?;
        }
        if changes.key_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::validation("Key name must not be empty"));
        }

        let update = KeyUpdate {
            key_name: changes.key_name.map(|n| n.trim().to_string()),
            key_type: changes.key_type,
            status: changes.status,
            max_users: changes.max_users,
            expires_at: changes.expires_at,
            ..Default::default()
        };
        let key = self
            .keys
            .update(id, update)
            .await?
            .ok_or_else(|| AppError::not_found("License key not found"))?;

        info!(key_id = %id, status = %key.status, "License key updated");
        Ok(key)
    }

    /// Delete a key with its occupancy records and audit entries.
    pub async fn delete(&self, ctx: &RequestContext, id: KeyId) -> AppResult<()> {
        require_admin(ctx)?;
        let deleted = {
            let _guard = self.locks.acquire(id).await;
            self.keys.delete(id).await?
        };
        self.locks.forget(id);

        if !deleted {
            return Err(AppError::not_found("License key not found"));
        }
        info!(key_id = %id, "License key deleted");
        Ok(())
    }
}

pub(crate) fn require_admin(ctx: &RequestContext) -> AppResult<()> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(AppError::authorization("Admin access required"))
    }
}

fn validate_max_users(max_users: i32) -> AppResult<()> {
    if max_users < 1 {
        return Err(AppError::validation("maxUsers must be at least 1"));
    }
    Ok(())
}
