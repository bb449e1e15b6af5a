//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use keygate_entity::key::{KeyStatus, KeyType};
use keygate_entity::user::User;
use keygate_service::{AuthSession, ConnectGrant, KeyValidation};

/// Successful connect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectResponse {
    /// Always `true`.
    pub status: bool,
    /// Grant payload.
    pub data: ConnectData,
}

/// Grant payload the mod menu checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectData {
    /// Legacy client token.
    pub token: String,
    /// Unix seconds at issuance.
    pub rng: i64,
    /// Display name.
    pub key_name: String,
    /// Tier.
    pub key_type: KeyType,
    /// Expiry, if any.
    pub expires_at: Option<DateTime<Utc>>,
    /// Cap.
    pub max_users: i32,
    /// Occupancy after this connect.
    pub current_users: i32,
}

impl From<ConnectGrant> for ConnectResponse {
    fn from(grant: ConnectGrant) -> Self {
        Self {
            status: true,
            data: ConnectData {
                token: grant.token,
                rng: grant.issued_at.timestamp(),
                key_name: grant.key.key_name,
                key_type: grant.key.key_type,
                expires_at: grant.key.expires_at,
                max_users: grant.key.max_users,
                current_users: grant.key.current_users,
            },
        }
    }
}

/// Bare `{status: true}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Always `true`.
    pub status: bool,
}

impl StatusResponse {
    /// The success body.
    pub fn ok() -> Self {
        Self { status: true }
    }
}

/// `POST /api/validate` answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidateResponse {
    /// Key found.
    #[serde(rename_all = "camelCase")]
    Known {
        /// Active and not past expiry.
        valid: bool,
        /// Tier.
        key_type: KeyType,
        /// Stored status.
        status: KeyStatus,
        /// Expiry.
        expires_at: Option<DateTime<Utc>>,
    },
    /// Key not found, or lookup failed.
    Rejected {
        /// Always `false`.
        valid: bool,
        /// Why.
        message: String,
    },
}

impl ValidateResponse {
    /// Lookup failure body.
    pub fn failed() -> Self {
        Self::Rejected {
            valid: false,
            message: "Validation failed".to_string(),
        }
    }
}

impl From<KeyValidation> for ValidateResponse {
    fn from(validation: KeyValidation) -> Self {
        match validation {
            KeyValidation::Unknown => Self::Rejected {
                valid: false,
                message: "Invalid key".to_string(),
            },
            KeyValidation::Known {
                valid,
                key_type,
                status,
                expires_at,
            } => Self::Known {
                valid,
                key_type,
                status,
                expires_at,
            },
        }
    }
}

/// Register/login answer.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// The account, without its password hash.
    pub user: User,
    /// Bearer token.
    pub token: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.user,
            token: session.token,
        }
    }
}

/// `{message}` confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Confirmation text.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Liveness probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Store backend in use.
    pub store: String,
}
