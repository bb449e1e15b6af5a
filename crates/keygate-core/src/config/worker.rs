//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Periodic maintenance worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Six-field cron expression for the stale-session sweep.
    #[serde(default = "default_reclaim_schedule")]
    pub reclaim_schedule: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            reclaim_schedule: default_reclaim_schedule(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_reclaim_schedule() -> String {
    "0 * * * * *".to_string()
}
