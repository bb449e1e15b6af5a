//! Per-key mutual exclusion.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use keygate_core::types::KeyId;

/// One async mutex per key id, created on first use.
///
/// Admission for a key holds its guard across reclaim, count, decide and
/// write. Different keys never contend.
#[derive(Debug, Clone, Default)]
pub struct KeyLockRegistry {
    locks: Arc<DashMap<KeyId, Arc<Mutex<()>>>>,
}

impl KeyLockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key_id`.
    pub async fn acquire(&self, key_id: KeyId) -> OwnedMutexGuard<()> {
        let lock = Arc::clone(&self.locks.entry(key_id).or_default());
        lock.lock_owned().await
    }

    /// Drop the mutex of a deleted key unless someone still holds it.
    pub fn forget(&self, key_id: KeyId) {
        self.locks
            .remove_if(&key_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Number of keys with a mutex allocated.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no mutex has been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
