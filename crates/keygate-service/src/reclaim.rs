//! Stale occupancy reclamation and occupancy recounting.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use keygate_core::config::admission::AdmissionConfig;
use keygate_core::result::AppResult;
use keygate_core::types::KeyId;
use keygate_database::store::{KeyStore, SessionRegistry};
use keygate_entity::key::KeyUpdate;

use crate::admission::KeyLockRegistry;

/// Result of a full reclaim sweep.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Keys that lost at least one occupancy record.
    pub affected_keys: usize,
    /// Keys whose `current_users` was rewritten.
    pub recounted: usize,
}

/// Removes occupancy records older than the staleness window and keeps each
/// key's cached `current_users` equal to its remaining record count.
#[derive(Debug, Clone)]
pub struct SessionReclaimer {
    keys: Arc<dyn KeyStore>,
    sessions: Arc<dyn SessionRegistry>,
    locks: KeyLockRegistry,
    window: Duration,
}

impl SessionReclaimer {
    /// Creates a new reclaimer.
    pub fn new(
        keys: Arc<dyn KeyStore>,
        sessions: Arc<dyn SessionRegistry>,
        locks: KeyLockRegistry,
        config: &AdmissionConfig,
    ) -> Self {
        Self {
            keys,
            sessions,
            locks,
            window: config.staleness_window(),
        }
    }

    /// The lock registry shared with the admission engine.
    pub fn locks(&self) -> &KeyLockRegistry {
        &self.locks
    }

    /// Records with `last_seen` before this instant are stale at `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window
    }

    /// Delete every stale record, across all keys.
    ///
    /// Returns the keys that lost records. Their `current_users` is not
    /// touched here; callers recount under the appropriate lock.
    pub async fn reclaim(&self, now: DateTime<Utc>) -> AppResult<Vec<KeyId>> {
        let affected = self.sessions.reclaim_stale(self.cutoff(now)).await?;
        if !affected.is_empty() {
            debug!(keys = affected.len(), "Reclaimed stale sessions");
        }
        Ok(affected)
    }

    /// Rewrite `current_users` of `key_id` from its record count.
    ///
    /// The caller must hold the key's lock. Returns `None` if the key is gone.
    pub async fn recount(&self, key_id: KeyId) -> AppResult<Option<i32>> {
        let count = self.sessions.list_for_key(key_id).await?.len() as i32;
        let update = KeyUpdate {
            current_users: Some(count),
            ..Default::default()
        };
        Ok(self.keys.update(key_id, update).await?.map(|_| count))
    }

    /// Recount each key under its own lock, one at a time, skipping `skip`.
    ///
    /// Must not be called while holding any key lock. Failures are logged and
    /// the remaining keys are still processed. Returns the number recounted.
    pub async fn recount_each(&self, key_ids: &[KeyId], skip: Option<KeyId>) -> usize {
        let mut recounted = 0;
        for &key_id in key_ids.iter().filter(|id| Some(**id) != skip) {
            let _guard = self.locks.acquire(key_id).await;
            match self.recount(key_id).await {
                Ok(Some(_)) => recounted += 1,
                Ok(None) => debug!(key_id = %key_id, "Reclaimed key no longer exists"),
                Err(e) => warn!(key_id = %key_id, error = %e, "Failed to recount occupancy"),
            }
        }
        recounted
    }

    /// Reclaim globally, then recount every affected key.
    pub async fn sweep(&self) -> AppResult<SweepReport> {
        let affected = self.reclaim(Utc::now()).await?;
        let recounted = self.recount_each(&affected, None).await;
        if !affected.is_empty() {
            info!(
                affected_keys = affected.len(),
                recounted, "Stale session sweep completed"
            );
        }
        Ok(SweepReport {
            affected_keys: affected.len(),
            recounted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keygate_database::MemoryStore;
    use keygate_database::store::Stores;
    use keygate_entity::key::{CreateLicenseKey, KeyStatus, KeyType};
    use keygate_entity::session::UpsertSession;

    async fn setup() -> (Stores, SessionReclaimer) {
        let stores = Stores::from_memory(Arc::new(MemoryStore::new()));
        let reclaimer = SessionReclaimer::new(
            stores.keys.clone(),
            stores.sessions.clone(),
            KeyLockRegistry::new(),
            &AdmissionConfig::default(),
        );
        (stores, reclaimer)
    }

    async fn key_with_sessions(stores: &Stores, secret: &str, ages_minutes: &[i64]) -> KeyId {
        let key = stores
            .keys
            .create(CreateLicenseKey {
                secret: secret.into(),
                key_name: secret.into(),
                key_type: KeyType::Lifetime,
                status: KeyStatus::Active,
                max_users: 5,
                expires_at: None,
                owner_id: None,
            })
            .await
            .unwrap();
        for (i, age) in ages_minutes.iter().enumerate() {
            stores
                .sessions
                .upsert(UpsertSession {
                    key_id: key.id,
                    hwid: format!("hw{i}"),
                    ip_address: "127.0.0.1".into(),
                    user_agent: String::new(),
                    last_seen: Utc::now() - Duration::minutes(*age),
                })
                .await
                .unwrap();
        }
        reclaimer_recount(stores, key.id).await;
        key.id
    }

    async fn reclaimer_recount(stores: &Stores, key_id: KeyId) {
        let count = stores.sessions.list_for_key(key_id).await.unwrap().len() as i32;
        stores
            .keys
            .update(
                key_id,
                KeyUpdate {
                    current_users: Some(count),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_sweep_recounts_affected_keys() {
        let (stores, reclaimer) = setup().await;
        let a = key_with_sessions(&stores, "A", &[10, 1]).await;
        let b = key_with_sessions(&stores, "B", &[1]).await;

        let report = reclaimer.sweep().await.unwrap();
        assert_eq!(report.affected_keys, 1);
        assert_eq!(report.recounted, 1);

        let a = stores.keys.find_by_id(a).await.unwrap().unwrap();
        let b = stores.keys.find_by_id(b).await.unwrap().unwrap();
        assert_eq!(a.current_users, 1);
        assert_eq!(b.current_users, 1);
    }

    #[tokio::test]
    async fn test_session_inside_window_survives() {
        let (stores, reclaimer) = setup().await;
        let key = key_with_sessions(&stores, "K", &[4]).await;
        assert!(reclaimer.reclaim(Utc::now()).await.unwrap().is_empty());
        assert_eq!(stores.sessions.list_for_key(key).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_recount_each_honours_skip() {
        let (stores, reclaimer) = setup().await;
        let key = key_with_sessions(&stores, "K", &[10]).await;
        reclaimer.reclaim(Utc::now()).await.unwrap();

        assert_eq!(reclaimer.recount_each(&[key], Some(key)).await, 0);
        let stale = stores.keys.find_by_id(key).await.unwrap().unwrap();
        assert_eq!(stale.current_users, 1);

        assert_eq!(reclaimer.recount_each(&[key], None).await, 1);
        let fresh = stores.keys.find_by_id(key).await.unwrap().unwrap();
        assert_eq!(fresh.current_users, 0);
    }
}
