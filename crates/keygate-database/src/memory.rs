//! Volatile in-memory backend.
//!
//! All four collections live behind one `RwLock` so that multi-collection
//! operations such as key deletion are atomic, matching the transactional
//! PostgreSQL implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use keygate_core::error::AppError;
use keygate_core::result::AppResult;
use keygate_core::types::{ApiLogId, KeyId, SessionId, UserId};
use keygate_entity::audit::{ApiLogEntry, ApiLogView, CreateApiLogEntry};
use keygate_entity::key::{CreateLicenseKey, KeyStatus, KeyUpdate, LicenseKey};
use keygate_entity::session::{ActiveSession, UpsertSession};
use keygate_entity::user::{CreateUser, User, UserUpdate};

use crate::store::{AuditLogStore, KeyStore, SessionRegistry, UserStore};

#[derive(Debug, Default)]
struct MemoryState {
    keys: HashMap<KeyId, LicenseKey>,
    sessions: HashMap<(KeyId, String), ActiveSession>,
    logs: Vec<ApiLogEntry>,
    users: HashMap<UserId, User>,
}

/// In-process store implementing every store trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a key record verbatim.
    pub async fn put_key(&self, key: LicenseKey) {
        self.state.write().await.keys.insert(key.id, key);
    }

    /// Insert or replace an occupancy record verbatim, keeping its `last_seen`.
    pub async fn put_session(&self, session: ActiveSession) {
        self.state
            .write()
            .await
            .sessions
            .insert((session.key_id, session.hwid.clone()), session);
    }
}

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
}

#[async_trait]
impl KeyStore for MemoryStore {
    async fn find_by_id(&self, id: KeyId) -> AppResult<Option<LicenseKey>> {
        Ok(self.state.read().await.keys.get(&id).cloned())
    }

    async fn find_by_secret(&self, secret: &str) -> AppResult<Option<LicenseKey>> {
        let state = self.state.read().await;
        Ok(state.keys.values().find(|k| k.secret == secret).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<LicenseKey>> {
        let state = self.state.read().await;
        Ok(state
            .keys
            .values()
            .filter(|k| k.key_name == name)
            .min_by_key(|k| k.created_at)
            .cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<LicenseKey>> {
        let mut keys: Vec<_> = self.state.read().await.keys.values().cloned().collect();
        newest_first(&mut keys, |k| k.created_at);
        Ok(keys)
    }

    async fn list_by_owner(&self, owner: UserId) -> AppResult<Vec<LicenseKey>> {
        let mut keys: Vec<_> = self
            .state
            .read()
            .await
            .keys
            .values()
            .filter(|k| k.owner_id == Some(owner))
            .cloned()
            .collect();
        newest_first(&mut keys, |k| k.created_at);
        Ok(keys)
    }

    async fn create(&self, data: CreateLicenseKey) -> AppResult<LicenseKey> {
        let mut state = self.state.write().await;
        if state.keys.values().any(|k| k.secret == data.secret) {
            return Err(AppError::conflict("License key secret already exists"));
        }
        let now = Utc::now();
        let key = LicenseKey {
            id: KeyId::new(),
            secret: data.secret,
            key_name: data.key_name,
            key_type: data.key_type,
            status: data.status,
            max_users: data.max_users,
            current_users: 0,
            expires_at: data.expires_at,
            last_used: None,
            owner_id: data.owner_id,
            created_at: now,
            updated_at: now,
        };
        state.keys.insert(key.id, key.clone());
        Ok(key)
    }

    async fn update(&self, id: KeyId, update: KeyUpdate) -> AppResult<Option<LicenseKey>> {
        let mut state = self.state.write().await;
        Ok(state.keys.get_mut(&id).map(|key| {
            update.apply_to(key);
            key.updated_at = Utc::now();
            key.clone()
        }))
    }

    async fn delete(&self, id: KeyId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.keys.remove(&id).is_none() {
            return Ok(false);
        }
        state.logs.retain(|l| l.key_id != Some(id));
        state.sessions.retain(|(key_id, _), _| *key_id != id);
        Ok(true)
    }

    async fn count_active(&self) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .keys
            .values()
            .filter(|k| k.status == KeyStatus::Active)
            .count() as i64)
    }
}

#[async_trait]
impl SessionRegistry for MemoryStore {
    async fn list_for_key(&self, key_id: KeyId) -> AppResult<Vec<ActiveSession>> {
        let state = self.state.read().await;
        let mut sessions: Vec<_> = state
            .sessions
            .values()
            .filter(|s| s.key_id == key_id)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.created_at);
        Ok(sessions)
    }

    async fn upsert(&self, data: UpsertSession) -> AppResult<ActiveSession> {
        let mut state = self.state.write().await;
        let session = state
            .sessions
            .entry((data.key_id, data.hwid.clone()))
            .and_modify(|existing| {
                existing.ip_address = data.ip_address.clone();
                existing.user_agent = data.user_agent.clone();
                existing.last_seen = data.last_seen;
            })
            .or_insert_with(|| ActiveSession {
                id: SessionId::new(),
                key_id: data.key_id,
                hwid: data.hwid.clone(),
                ip_address: data.ip_address.clone(),
                user_agent: data.user_agent.clone(),
                last_seen: data.last_seen,
                created_at: data.last_seen,
            });
        Ok(session.clone())
    }

    async fn remove(&self, key_id: KeyId, hwid: &str) -> AppResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.sessions.remove(&(key_id, hwid.to_string())).is_some())
    }

    async fn reclaim_stale(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<KeyId>> {
        let mut state = self.state.write().await;
        let mut affected = Vec::new();
        state.sessions.retain(|(key_id, _), session| {
            let stale = session.is_stale(cutoff);
            if stale {
                affected.push(*key_id);
            }
            !stale
        });
        affected.sort();
        affected.dedup();
        Ok(affected)
    }

    async fn count_all(&self) -> AppResult<i64> {
        Ok(self.state.read().await.sessions.len() as i64)
    }
}

#[async_trait]
impl AuditLogStore for MemoryStore {
    async fn append(&self, entry: CreateApiLogEntry) -> AppResult<ApiLogEntry> {
        let record = ApiLogEntry {
            id: ApiLogId::new(),
            endpoint: entry.endpoint,
            method: entry.method,
            key_id: entry.key_id,
            hwid: entry.hwid,
            ip_address: entry.ip_address,
            user_agent: entry.user_agent,
            response: entry.response,
            success: entry.success,
            created_at: Utc::now(),
        };
        self.state.write().await.logs.push(record.clone());
        Ok(record)
    }

    async fn recent(&self, limit: i64) -> AppResult<Vec<ApiLogView>> {
        let state = self.state.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(state
            .logs
            .iter()
            .rev()
            .take(limit)
            .map(|entry| ApiLogView {
                key_name: entry
                    .key_id
                    .and_then(|id| state.keys.get(&id))
                    .map(|k| k.key_name.clone()),
                entry: entry.clone(),
            })
            .collect())
    }

    async fn count_all(&self) -> AppResult<i64> {
        Ok(self.state.read().await.logs.len() as i64)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<_> = self.state.read().await.users.values().cloned().collect();
        newest_first(&mut users, |u| u.created_at);
        Ok(users)
    }

    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        if state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&data.email))
        {
            return Err(AppError::conflict("User already exists"));
        }
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: UserId, update: UserUpdate) -> AppResult<Option<User>> {
        let mut state = self.state.write().await;
        Ok(state.users.get_mut(&id).map(|user| {
            update.apply_to(user);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.users.remove(&id).is_none() {
            return Ok(false);
        }
        for key in state.keys.values_mut() {
            if key.owner_id == Some(id) {
                key.owner_id = None;
            }
        }
        Ok(true)
    }

    async fn count_all(&self) -> AppResult<i64> {
        Ok(self.state.read().await.users.len() as i64)
    }
}
