//! Occupancy record repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use keygate_core::error::{AppError, ErrorKind};
use keygate_core::result::AppResult;
use keygate_core::types::{KeyId, SessionId};
use keygate_entity::session::{ActiveSession, UpsertSession};

use crate::store::SessionRegistry;

/// Repository for `(key, hwid)` occupancy records.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRegistry for SessionRepository {
    async fn list_for_key(&self, key_id: KeyId) -> AppResult<Vec<ActiveSession>> {
        sqlx::query_as::<_, ActiveSession>(
            "SELECT * FROM active_sessions WHERE key_id = $1 ORDER BY created_at ASC",
        )
        .bind(key_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sessions", e))
    }

    async fn upsert(&self, data: UpsertSession) -> AppResult<ActiveSession> {
        sqlx::query_as::<_, ActiveSession>(
            r#"INSERT INTO active_sessions (id, key_id, hwid, ip_address, user_agent, last_seen, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $6)
               ON CONFLICT (key_id, hwid) DO UPDATE SET
                   ip_address = EXCLUDED.ip_address,
                   user_agent = EXCLUDED.user_agent,
                   last_seen  = EXCLUDED.last_seen
               RETURNING *"#,
        )
        .bind(SessionId::new())
        .bind(data.key_id)
        .bind(&data.hwid)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .bind(data.last_seen)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert session", e))
    }

    async fn remove(&self, key_id: KeyId, hwid: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM active_sessions WHERE key_id = $1 AND hwid = $2")
            .bind(key_id)
            .bind(hwid)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove session", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn reclaim_stale(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<KeyId>> {
        let mut affected: Vec<KeyId> =
            sqlx::query_scalar("DELETE FROM active_sessions WHERE last_seen < $1 RETURNING key_id")
                .bind(cutoff)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to reclaim stale sessions", e)
                })?;
        affected.sort();
        affected.dedup();
        Ok(affected)
    }

    async fn count_all(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM active_sessions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count sessions", e))
    }
}
