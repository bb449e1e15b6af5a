//! Active session (occupancy record) model.

use chrono::{DateTime, Utc};
use keygate_core::types::{KeyId, SessionId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A `(key, hwid)` pair currently counted against a key's cap.
///
/// At most one record exists per pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    /// Record identifier.
    pub id: SessionId,
    /// Owning key.
    pub key_id: KeyId,
    /// Client-supplied hardware identifier. Untrusted, not validated.
    pub hwid: String,
    /// Source address of the last connect.
    pub ip_address: String,
    /// User-Agent of the last connect.
    pub user_agent: String,
    /// Refreshed on every successful connect for the pair.
    pub last_seen: DateTime<Utc>,
    /// First successful connect for the pair.
    pub created_at: DateTime<Utc>,
}

impl ActiveSession {
    /// Whether `last_seen` is strictly older than `cutoff`.
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_seen < cutoff
    }
}

/// Insert-or-replace input for an occupancy record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertSession {
    /// Owning key.
    pub key_id: KeyId,
    /// Hardware identifier.
    pub hwid: String,
    /// Source address.
    pub ip_address: String,
    /// User-Agent.
    pub user_agent: String,
    /// New `last_seen` value.
    pub last_seen: DateTime<Utc>,
}
