//! JWT claims embedded in admin bearer tokens.

use serde::{Deserialize, Serialize};

use keygate_core::types::UserId;
use keygate_entity::user::UserRole;

/// Claims payload of an admin bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: UserId,
    /// Email at issuance.
    pub email: String,
    /// Role at issuance.
    pub role: UserRole,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the user id from the subject claim.
    pub fn user_id(&self) -> UserId {
        self.sub
    }
}
