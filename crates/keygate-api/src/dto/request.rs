//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use keygate_entity::key::{KeyStatus, KeyType};
use keygate_entity::user::UserRole;
use keygate_service::{
    ClientInfo, ConnectRequest, DisconnectRequest, KeyChanges, NewKey, Registration, UserChanges,
};

/// Mod-menu connect form: `game=PUBG&user_key={key}&serial={hwid}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectBody {
    /// Key secret or display name.
    pub user_key: Option<String>,
    /// Hardware identifier.
    pub serial: Option<String>,
    /// Game tag. Ignored.
    pub game: Option<String>,
}

impl ConnectBody {
    /// Converts into the engine's request.
    pub fn into_request(self, client: ClientInfo) -> ConnectRequest {
        ConnectRequest {
            credential: self.user_key,
            hwid: self.serial,
            client,
        }
    }
}

/// Mod-menu disconnect form: `user_key={key}&serial={hwid}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisconnectBody {
    /// Key secret or display name.
    pub user_key: Option<String>,
    /// Hardware identifier.
    pub serial: Option<String>,
}

impl DisconnectBody {
    /// Converts into the engine's request.
    pub fn into_request(self, client: ClientInfo) -> DisconnectRequest {
        DisconnectRequest {
            credential: self.user_key,
            hwid: self.serial,
            client,
        }
    }
}

/// `POST /api/validate` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidateBody {
    /// Key secret.
    pub key: Option<String>,
}

/// Registration body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username.
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing required fields"))]
    pub username: String,
    /// Email.
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password.
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing required fields"))]
    pub password: String,
    /// Optional role.
    pub role: Option<UserRole>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            role: req.role,
        }
    }
}

/// Login body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email.
    #[serde(default)]
    #[validate(length(min = 1, message = "Invalid credentials"))]
    pub email: String,
    /// Password.
    #[serde(default)]
    #[validate(length(min = 1, message = "Invalid credentials"))]
    pub password: String,
}

/// Key issuance body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeyRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Key name is required"))]
    pub key_name: String,
    /// Tier.
    pub key_type: KeyType,
    /// Concurrent cap.
    #[validate(range(min = 1, message = "maxUsers must be at least 1"))]
    pub max_users: Option<i32>,
    /// Initial status.
    pub status: Option<KeyStatus>,
}

impl From<CreateKeyRequest> for NewKey {
    fn from(req: CreateKeyRequest) -> Self {
        Self {
            key_name: req.key_name,
            key_type: req.key_type,
            max_users: req.max_users,
            status: req.status,
        }
    }
}

/// Partial key update. `"expiresAt": null` clears the expiry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKeyRequest {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Key name must not be empty"))]
    pub key_name: Option<String>,
    /// Tier.
    pub key_type: Option<KeyType>,
    /// Status.
    pub status: Option<KeyStatus>,
    /// Concurrent cap.
    #[validate(range(min = 1, message = "maxUsers must be at least 1"))]
    pub max_users: Option<i32>,
    /// Expiry.
    #[serde(default, deserialize_with = "double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateKeyRequest> for KeyChanges {
    fn from(req: UpdateKeyRequest) -> Self {
        Self {
            key_name: req.key_name,
            key_type: req.key_type,
            status: req.status,
            max_users: req.max_users,
            expires_at: req.expires_at,
        }
    }
}

/// Partial user update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: Option<String>,
    /// Email.
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    /// New password.
    pub password: Option<String>,
    /// Role.
    pub role: Option<UserRole>,
    /// Active flag.
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            role: req.role,
            is_active: req.is_active,
        }
    }
}

/// Distinguishes an absent field from an explicit `null`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
