//! License key entity model.

use chrono::{DateTime, Utc};
use keygate_core::types::{KeyId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::kind::KeyType;
use super::status::KeyStatus;

/// A license key governing access and concurrency for one cohort of clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LicenseKey {
    /// Server-generated identifier.
    pub id: KeyId,
    /// Secret credential presented by clients.
    #[serde(rename = "key")]
    pub secret: String,
    /// Human-readable alias, also accepted as a credential.
    pub key_name: String,
    /// Tier.
    pub key_type: KeyType,
    /// Lifecycle state.
    pub status: KeyStatus,
    /// Concurrent occupancy cap.
    pub max_users: i32,
    /// Cached count of occupancy records for this key.
    pub current_users: i32,
    /// `None` means the key never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// Time of the last successful connect.
    pub last_used: Option<DateTime<Utc>>,
    /// Account that issued the key.
    #[serde(rename = "userId")]
    pub owner_id: Option<UserId>,
    /// When the key was created.
    pub created_at: DateTime<Utc>,
    /// When the key was last modified.
    pub updated_at: DateTime<Utc>,
}

impl LicenseKey {
    /// Whether the key is in the `active` state.
    pub fn is_active(&self) -> bool {
        self.status == KeyStatus::Active
    }

    /// Whether `expires_at` lies in the past relative to `now`.
    pub fn is_past_expiry(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at < now)
    }
}

/// Data required to create a new license key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLicenseKey {
    /// Generated secret.
    pub secret: String,
    /// Display name.
    pub key_name: String,
    /// Tier.
    pub key_type: KeyType,
    /// Initial status.
    pub status: KeyStatus,
    /// Occupancy cap.
    pub max_users: i32,
    /// Expiry, usually derived from the tier.
    pub expires_at: Option<DateTime<Utc>>,
    /// Issuing account.
    pub owner_id: Option<UserId>,
}

/// Partial update of a license key. `None` leaves a field untouched.
///
/// All present fields are written in a single statement so a concurrent
/// reader never observes half of an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyUpdate {
    /// New display name.
    pub key_name: Option<String>,
    /// New tier.
    pub key_type: Option<KeyType>,
    /// New status.
    pub status: Option<KeyStatus>,
    /// New occupancy cap.
    pub max_users: Option<i32>,
    /// Recomputed occupancy count.
    pub current_users: Option<i32>,
    /// `Some(None)` clears the expiry.
    pub expires_at: Option<Option<DateTime<Utc>>>,
    /// New last-used timestamp.
    pub last_used: Option<DateTime<Utc>>,
}

impl KeyUpdate {
    /// Whether the update touches no field.
    pub fn is_empty(&self) -> bool {
        self.key_name.is_none()
            && self.key_type.is_none()
            && self.status.is_none()
            && self.max_users.is_none()
            && self.current_users.is_none()
            && self.expires_at.is_none()
            && self.last_used.is_none()
    }

    /// Apply the present fields to `key` in place.
    pub fn apply_to(&self, key: &mut LicenseKey) {
        if let Some(name) = &self.key_name {
            key.key_name = name.clone();
        }
        if let Some(key_type) = self.key_type {
            key.key_type = key_type;
        }
        if let Some(status) = self.status {
            key.status = status;
        }
        if let Some(max_users) = self.max_users {
            key.max_users = max_users;
        }
        if let Some(current) = self.current_users {
            key.current_users = current;
        }
        if let Some(expires_at) = self.expires_at {
            key.expires_at = expires_at;
        }
        if let Some(last_used) = self.last_used {
            key.last_used = Some(last_used);
        }
    }
}
