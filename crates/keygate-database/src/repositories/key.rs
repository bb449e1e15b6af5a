//! License key repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use keygate_core::error::{AppError, ErrorKind};
use keygate_core::result::AppResult;
use keygate_core::types::{KeyId, UserId};
use keygate_entity::key::{CreateLicenseKey, KeyStatus, KeyUpdate, LicenseKey};

use crate::store::KeyStore;

/// Repository for license key records.
#[derive(Debug, Clone)]
pub struct LicenseKeyRepository {
    pool: PgPool,
}

impl LicenseKeyRepository {
    /// Create a new license key repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyStore for LicenseKeyRepository {
    async fn find_by_id(&self, id: KeyId) -> AppResult<Option<LicenseKey>> {
        sqlx::query_as::<_, LicenseKey>("SELECT * FROM license_keys WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find key by id", e))
    }

    async fn find_by_secret(&self, secret: &str) -> AppResult<Option<LicenseKey>> {
        sqlx::query_as::<_, LicenseKey>("SELECT * FROM license_keys WHERE secret = $1")
            .bind(secret)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find key by secret", e)
            })
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<LicenseKey>> {
        sqlx::query_as::<_, LicenseKey>(
            "SELECT * FROM license_keys WHERE key_name = $1 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find key by name", e))
    }

    async fn list_all(&self) -> AppResult<Vec<LicenseKey>> {
        sqlx::query_as::<_, LicenseKey>("SELECT * FROM license_keys ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list keys", e))
    }

    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<LicenseKey>> {
        sqlx::query_as::<_, LicenseKey>(
            "SELECT * FROM license_keys WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list keys by owner", e))
    }

    async fn create(&self, data: CreateLicenseKey) -> AppResult<LicenseKey> {
        sqlx::query_as::<_, LicenseKey>(
            r#"INSERT INTO license_keys
                (id, secret, key_name, key_type, status, max_users, current_users, expires_at, owner_id)
               VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $8)
               RETURNING *"#,
        )
        .bind(KeyId::new())
        .bind(&data.secret)
        .bind(&data.key_name)
        .bind(data.key_type)
        .bind(data.status)
        .bind(data.max_users)
        .bind(data.expires_at)
        .bind(data.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create key", e))
    }

    async fn update(&self, id: KeyId, update: KeyUpdate) -> AppResult<Option<LicenseKey>> {
        let (set_expiry, expires_at) = match update.expires_at {
            Some(value) => (true, value),
            None => (false, None),
        };

        sqlx::query_as::<_, LicenseKey>(
            r#"UPDATE license_keys SET
                key_name      = COALESCE($2, key_name),
                key_type      = COALESCE($3, key_type),
                status        = COALESCE($4, status),
                max_users     = COALESCE($5, max_users),
                current_users = COALESCE($6, current_users),
                expires_at    = CASE WHEN $7 THEN $8 ELSE expires_at END,
                last_used     = COALESCE($9, last_used),
                updated_at    = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(update.key_name)
        .bind(update.key_type)
        .bind(update.status)
        .bind(update.max_users)
        .bind(update.current_users)
        .bind(set_expiry)
        .bind(expires_at)
        .bind(update.last_used)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update key", e))
    }

    async fn delete(&self, id: KeyId) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM api_logs WHERE key_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete key logs", e))?;

        sqlx::query("DELETE FROM active_sessions WHERE key_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete key sessions", e)
            })?;

        let result = sqlx::query("DELETE FROM license_keys WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete key", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit key deletion", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_active(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM license_keys WHERE status = $1")
            .bind(KeyStatus::Active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count active keys", e)
            })
    }
}
