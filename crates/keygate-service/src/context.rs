//! Request context carrying the authenticated account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use keygate_core::types::UserId;
use keygate_entity::user::UserRole;

/// Context for the current authenticated admin request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's id.
    pub user_id: UserId,
    /// Role as currently stored, not as issued in the token.
    pub role: UserRole,
    /// IP address of the request origin.
    pub ip_address: String,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: UserId,
        role: UserRole,
        ip_address: String,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            user_id,
            role,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
