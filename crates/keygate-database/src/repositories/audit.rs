//! Audit log repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use keygate_core::error::{AppError, ErrorKind};
use keygate_core::result::AppResult;
use keygate_core::types::ApiLogId;
use keygate_entity::audit::{ApiLogEntry, ApiLogView, CreateApiLogEntry};

use crate::store::AuditLogStore;

/// Append-only repository for admission audit entries.
#[derive(Debug, Clone)]
pub struct ApiLogRepository {
    pool: PgPool,
}

impl ApiLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditLogStore for ApiLogRepository {
    async fn append(&self, entry: CreateApiLogEntry) -> AppResult<ApiLogEntry> {
        sqlx::query_as::<_, ApiLogEntry>(
            r#"INSERT INTO api_logs
                (id, endpoint, method, key_id, hwid, ip_address, user_agent, response, success)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING *"#,
        )
        .bind(ApiLogId::new())
        .bind(&entry.endpoint)
        .bind(&entry.method)
        .bind(entry.key_id)
        .bind(&entry.hwid)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(&entry.response)
        .bind(entry.success)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append audit entry", e))
    }

    async fn recent(&self, limit: i64) -> AppResult<Vec<ApiLogView>> {
        sqlx::query_as::<_, ApiLogView>(
            r#"SELECT l.*, k.key_name
               FROM api_logs l
               LEFT JOIN license_keys k ON k.id = l.key_id
               ORDER BY l.created_at DESC
               LIMIT $1"#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list audit entries", e))
    }

    async fn count_all(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM api_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count audit entries", e))
    }
}
