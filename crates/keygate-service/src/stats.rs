//! Dashboard statistics.

use serde::{Deserialize, Serialize};

use keygate_core::result::AppResult;
use keygate_database::store::Stores;

use crate::context::RequestContext;
use crate::key::require_admin;

/// Aggregate counts shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Registered accounts.
    pub total_users: i64,
    /// Keys in the `active` state.
    pub active_keys: i64,
    /// Audit entries recorded.
    pub api_requests: i64,
    /// Occupancy records currently held.
    pub active_sessions: i64,
}

/// Aggregates counts across the four collections.
#[derive(Debug, Clone)]
pub struct StatsService {
    stores: Stores,
}

impl StatsService {
    /// Creates a new stats service.
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Current dashboard counts.
    pub async fn dashboard(&self, ctx: &RequestContext) -> AppResult<DashboardStats> {
        require_admin(ctx)?;
        let (total_users, active_keys, api_requests, active_sessions) = futures::try_join!(
            self.stores.users.count_all(),
            self.stores.keys.count_active(),
            self.stores.audit.count_all(),
            self.stores.sessions.count_all(),
        )?;
        Ok(DashboardStats {
            total_users,
            active_keys,
            api_requests,
            active_sessions,
        })
    }
}
