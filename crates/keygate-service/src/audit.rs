//! Admission audit logging.

use std::sync::Arc;

use tracing::error;

use keygate_core::result::AppResult;
use keygate_database::store::AuditLogStore;
use keygate_entity::audit::{ApiLogView, CreateApiLogEntry};

/// Writes and reads the admission audit trail.
///
/// `record` is called on every admission path and never fails the caller: a
/// store failure is reported to operational logs and swallowed so the
/// decision still reaches the client.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    store: Arc<dyn AuditLogStore>,
}

impl AuditLogger {
    /// Creates a new audit logger.
    pub fn new(store: Arc<dyn AuditLogStore>) -> Self {
        Self { store }
    }

    /// Append an entry, swallowing store failures.
    pub async fn record(&self, entry: CreateApiLogEntry) {
        let endpoint = entry.endpoint.clone();
        let response = entry.response.clone();
        if let Err(e) = self.store.append(entry).await {
            error!(
                endpoint = %endpoint,
                response = %response,
                error = %e,
                "Failed to write audit entry"
            );
        }
    }

    /// The `limit` most recent entries with their key's current name.
    pub async fn recent(&self, limit: i64) -> AppResult<Vec<ApiLogView>> {
        self.store.recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use keygate_core::error::AppError;
    use keygate_entity::audit::ApiLogEntry;

    #[derive(Debug)]
    struct BrokenStore;

    #[async_trait]
    impl AuditLogStore for BrokenStore {
        async fn append(&self, _entry: CreateApiLogEntry) -> AppResult<ApiLogEntry> {
            Err(AppError::database("disk full"))
        }

        async fn recent(&self, _limit: i64) -> AppResult<Vec<ApiLogView>> {
            Err(AppError::database("disk full"))
        }

        async fn count_all(&self) -> AppResult<i64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_record_swallows_failures() {
        let logger = AuditLogger::new(Arc::new(BrokenStore));
        logger
            .record(CreateApiLogEntry {
                endpoint: "/api/connect".into(),
                method: "POST".into(),
                key_id: None,
                hwid: None,
                ip_address: "unknown".into(),
                user_agent: String::new(),
                response: "error: key required".into(),
                success: false,
            })
            .await;
        assert!(logger.recent(10).await.is_err());
    }
}
