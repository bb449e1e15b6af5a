//! Session admission configuration.

use serde::{Deserialize, Serialize};

/// Upper bound accepted for `staleness_window_seconds` (one week).
pub const MAX_STALENESS_WINDOW_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Settings consumed by the connect/disconnect protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Sessions whose `last_seen` is older than this are reclaimed.
    #[serde(default = "default_staleness_window")]
    pub staleness_window_seconds: u64,
    /// Leading segment of the legacy client token input.
    #[serde(default = "default_token_prefix")]
    pub token_prefix: String,
    /// Static shared secret mixed into the legacy client token.
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Number of audit entries returned by the admin log listing.
    #[serde(default = "default_log_list_limit")]
    pub log_list_limit: i64,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            staleness_window_seconds: default_staleness_window(),
            token_prefix: default_token_prefix(),
            token_secret: default_token_secret(),
            log_list_limit: default_log_list_limit(),
        }
    }
}

impl AdmissionConfig {
    /// The staleness window as a chrono duration.
    pub fn staleness_window(&self) -> chrono::Duration {
        i64::try_from(self.staleness_window_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

fn default_staleness_window() -> u64 {
    300
}

fn default_token_prefix() -> String {
    "PUBG".to_string()
}

fn default_token_secret() -> String {
    "Vm8Lk7Uj2JmsjCPVPVjrLa7zgfx3uz9E".to_string()
}

fn default_log_list_limit() -> i64 {
    50
}
