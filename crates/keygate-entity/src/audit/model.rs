//! Audit log entry model.

use chrono::{DateTime, Utc};
use keygate_core::types::{ApiLogId, KeyId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An immutable record of one admission decision.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApiLogEntry {
    /// Entry identifier.
    pub id: ApiLogId,
    /// Canonical endpoint, e.g. `/api/connect`.
    pub endpoint: String,
    /// HTTP method.
    pub method: String,
    /// Resolved key, when resolution got that far.
    pub key_id: Option<KeyId>,
    /// Hardware identifier as supplied.
    pub hwid: Option<String>,
    /// Source address.
    pub ip_address: String,
    /// User-Agent.
    pub user_agent: String,
    /// Short outcome string, e.g. `error: key expired`.
    pub response: String,
    /// Whether the decision admitted or released a slot.
    pub success: bool,
    /// When the decision was made.
    pub created_at: DateTime<Utc>,
}

/// An audit entry enriched at read time with the key's current name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApiLogView {
    /// The stored entry.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub entry: ApiLogEntry,
    /// `None` when the key no longer exists or was never resolved.
    pub key_name: Option<String>,
}

/// Data required to append an audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApiLogEntry {
    /// Canonical endpoint.
    pub endpoint: String,
    /// HTTP method.
    pub method: String,
    /// Resolved key.
    pub key_id: Option<KeyId>,
    /// Hardware identifier.
    pub hwid: Option<String>,
    /// Source address.
    pub ip_address: String,
    /// User-Agent.
    pub user_agent: String,
    /// Outcome string.
    pub response: String,
    /// Success flag.
    pub success: bool,
}
