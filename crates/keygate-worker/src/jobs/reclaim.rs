//! Periodic stale-session sweep.

use serde_json::Value;
use tracing;

use keygate_core::result::AppResult;
use keygate_service::SessionReclaimer;

/// Deletes stale occupancy records and recounts the keys that lost them.
#[derive(Debug, Clone)]
pub struct ReclaimJob {
    reclaimer: SessionReclaimer,
}

impl ReclaimJob {
    /// Create a new reclaim job
    pub fn new(reclaimer: SessionReclaimer) -> Self {
        Self { reclaimer }
    }

    /// Run one sweep and summarize it
    pub async fn run(&self) -> AppResult<Value> {
        tracing::debug!("Running stale session sweep");
        let report = self.reclaimer.sweep().await?;
        Ok(serde_json::json!({
            "task": "session_reclaim",
            "affected_keys": report.affected_keys,
            "recounted": report.recounted,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use keygate_core::config::admission::AdmissionConfig;
    use keygate_database::MemoryStore;
    use keygate_database::store::Stores;
    use keygate_entity::key::{CreateLicenseKey, KeyStatus, KeyType, KeyUpdate};
    use keygate_entity::session::UpsertSession;
    use keygate_service::KeyLockRegistry;

    #[tokio::test]
    async fn test_sweep_recounts_idle_key() {
        let stores = Stores::from_memory(Arc::new(MemoryStore::new()));
        let key = stores
            .keys
            .create(CreateLicenseKey {
                secret: "IDLE".into(),
                key_name: "idle".into(),
                key_type: KeyType::Premium,
                status: KeyStatus::Active,
                max_users: 2,
                expires_at: None,
                owner_id: None,
            })
            .await
            .unwrap();
        stores
            .sessions
            .upsert(UpsertSession {
                key_id: key.id,
                hwid: "hw".into(),
                ip_address: "1.1.1.1".into(),
                user_agent: String::new(),
                last_seen: Utc::now() - Duration::minutes(10),
            })
            .await
            .unwrap();
        stores
            .keys
            .update(
                key.id,
                KeyUpdate {
                    current_users: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let reclaimer = SessionReclaimer::new(
            stores.keys.clone(),
            stores.sessions.clone(),
            KeyLockRegistry::new(),
            &AdmissionConfig::default(),
        );
        let summary = ReclaimJob::new(reclaimer).run().await.unwrap();
        assert_eq!(summary["affected_keys"], 1);
        assert_eq!(summary["recounted"], 1);

        let key = stores.keys.find_by_id(key.id).await.unwrap().unwrap();
        assert_eq!(key.current_users, 0);
        assert_eq!(stores.sessions.count_all().await.unwrap(), 0);
    }
}
