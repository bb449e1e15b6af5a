//! Store traits consumed by the service layer.
//!
//! Every trait returns "not found" as `Ok(None)` or `Ok(false)`, never as an
//! error. Errors are reserved for backend failures.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use keygate_core::config::AppConfig;
use keygate_core::config::store::StoreProvider;
use keygate_core::result::AppResult;
use keygate_core::types::{KeyId, UserId};
use keygate_entity::audit::{ApiLogEntry, ApiLogView, CreateApiLogEntry};
use keygate_entity::key::{CreateLicenseKey, KeyUpdate, LicenseKey};
use keygate_entity::session::{ActiveSession, UpsertSession};
use keygate_entity::user::{CreateUser, User, UserUpdate};

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::repositories::{
    ApiLogRepository, LicenseKeyRepository, SessionRepository, UserRepository,
};

/// Durable table of license keys.
#[async_trait]
pub trait KeyStore: Send + Sync + Debug + 'static {
    /// Get a key by id.
    async fn find_by_id(&self, id: KeyId) -> AppResult<Option<LicenseKey>>;

    /// Exact match on the secret credential.
    async fn find_by_secret(&self, secret: &str) -> AppResult<Option<LicenseKey>>;

    /// Exact match on the display name. Returns the oldest key when names collide.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<LicenseKey>>;

    /// Every key, newest first.
    async fn list_all(&self) -> AppResult<Vec<LicenseKey>>;

    /// Keys issued by `owner`, newest first.
    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<LicenseKey>>;

    /// Insert a new key with `current_users = 0`.
    async fn create(&self, data: CreateLicenseKey) -> AppResult<LicenseKey>;

    /// Atomically apply a partial update. `None` if the key does not exist.
    async fn update(&self, id: KeyId, update: KeyUpdate) -> AppResult<Option<LicenseKey>>;

    /// Delete a key together with its audit entries and occupancy records.
    async fn delete(&self, id: KeyId) -> AppResult<bool>;

    /// Number of keys in the `active` state.
    async fn count_active(&self) -> AppResult<i64>;
}

/// Durable table of `(key, hwid)` occupancy records.
#[async_trait]
pub trait SessionRegistry: Send + Sync + Debug + 'static {
    /// All occupancy records of a key.
    async fn list_for_key(&self, key_id: KeyId) -> AppResult<Vec<ActiveSession>>;

    /// Replace the record for `(key_id, hwid)` or insert a new one.
    async fn upsert(&self, data: UpsertSession) -> AppResult<ActiveSession>;

    /// Remove the record for `(key_id, hwid)`. `false` if none existed.
    async fn remove(&self, key_id: KeyId, hwid: &str) -> AppResult<bool>;

    /// Delete every record with `last_seen < cutoff`, across all keys.
    ///
    /// Returns the distinct keys that lost at least one record.
    async fn reclaim_stale(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<KeyId>>;

    /// Total number of occupancy records.
    async fn count_all(&self) -> AppResult<i64>;
}

/// Append-only admission audit trail.
#[async_trait]
pub trait AuditLogStore: Send + Sync + Debug + 'static {
    /// Append an entry.
    async fn append(&self, entry: CreateApiLogEntry) -> AppResult<ApiLogEntry>;

    /// The `limit` most recent entries, newest first, with the current key name.
    async fn recent(&self, limit: i64) -> AppResult<Vec<ApiLogView>>;

    /// Total number of entries.
    async fn count_all(&self) -> AppResult<i64>;
}

/// Administrative accounts.
#[async_trait]
pub trait UserStore: Send + Sync + Debug + 'static {
    /// Get a user by id.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Case-insensitive email lookup.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Case-insensitive username lookup.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Every user, newest first.
    async fn list_all(&self) -> AppResult<Vec<User>>;

    /// Insert a new active user.
    async fn create(&self, data: CreateUser) -> AppResult<User>;

    /// Apply a partial update. `None` if the user does not exist.
    async fn update(&self, id: UserId, update: UserUpdate) -> AppResult<Option<User>>;

    /// Delete a user. Keys it issued lose their owner.
    async fn delete(&self, id: UserId) -> AppResult<bool>;

    /// Total number of users.
    async fn count_all(&self) -> AppResult<i64>;
}

/// The four record collections, bound to one backend.
#[derive(Debug, Clone)]
pub struct Stores {
    /// License keys.
    pub keys: Arc<dyn KeyStore>,
    /// Occupancy records.
    pub sessions: Arc<dyn SessionRegistry>,
    /// Audit trail.
    pub audit: Arc<dyn AuditLogStore>,
    /// Accounts.
    pub users: Arc<dyn UserStore>,
    /// Present when the backend is PostgreSQL.
    pub database: Option<DatabasePool>,
}

impl Stores {
    /// Build the stores selected by `store.provider`.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        match config.store.provider {
            StoreProvider::Postgres => {
                let db = DatabasePool::connect(&config.database).await?;
                Ok(Self::postgres(db))
            }
            StoreProvider::Memory => {
                info!("Using volatile in-memory store");
                Ok(Self::in_memory())
            }
        }
    }

    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            keys: Arc::new(LicenseKeyRepository::new(pool.clone())),
            sessions: Arc::new(SessionRepository::new(pool.clone())),
            audit: Arc::new(ApiLogRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool)),
            database: Some(db),
        }
    }

    /// Stores backed by one shared [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Stores backed by an existing [`MemoryStore`], e.g. one a test seeds directly.
    pub fn from_memory(memory: Arc<MemoryStore>) -> Self {
        Self {
            keys: memory.clone(),
            sessions: memory.clone(),
            audit: memory.clone(),
            users: memory,
            database: None,
        }
    }
}
