//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod admission;
pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod store;
pub mod worker;

use serde::{Deserialize, Serialize};

use self::admission::AdmissionConfig;
use self::app::ServerConfig;
use self::auth::AuthConfig;
use self::database::DatabaseConfig;
use self::logging::LoggingConfig;
use self::store::{StoreConfig, StoreProvider};
use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Persistence backend selection.
    #[serde(default)]
    pub store: StoreConfig,
    /// Admin authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session admission settings.
    #[serde(default)]
    pub admission: AdmissionConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `KEYGATE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("KEYGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Load configuration from an explicit file path plus environment variables.
    pub fn from_file(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(true))
            .add_source(
                config::Environment::with_prefix("KEYGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to read '{path}': {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.store.provider == StoreProvider::Postgres && self.database.url.trim().is_empty() {
            return Err(AppError::configuration(
                "database.url is required when store.provider = \"postgres\"",
            ));
        }
        if self.admission.staleness_window_seconds == 0 {
            return Err(AppError::configuration(
                "admission.staleness_window_seconds must be positive",
            ));
        }
        if self.admission.staleness_window_seconds > admission::MAX_STALENESS_WINDOW_SECONDS {
            return Err(AppError::configuration(format!(
                "admission.staleness_window_seconds must not exceed {}",
                admission::MAX_STALENESS_WINDOW_SECONDS
            )));
        }
        if self.admission.log_list_limit == 0 {
            return Err(AppError::configuration(
                "admission.log_list_limit must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_require_database_url() {
        let config = AppConfig::default();
        assert_eq!(config.store.provider, StoreProvider::Postgres);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_memory_store_needs_no_url() {
        let mut config = AppConfig::default();
        config.store.provider = StoreProvider::Memory;
        assert!(config.validate().is_ok());
        assert_eq!(config.admission.staleness_window_seconds, 300);
        assert_eq!(config.admission.token_prefix, "PUBG");
        assert_eq!(config.auth.jwt_ttl_hours, 24);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = AppConfig::default();
        config.store.provider = StoreProvider::Memory;
        config.admission.staleness_window_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_window_rejected() {
        let mut config = AppConfig::default();
        config.store.provider = StoreProvider::Memory;
        config.admission.staleness_window_seconds = u64::MAX;
        assert!(config.validate().is_err());
        assert_eq!(config.admission.staleness_window(), chrono::Duration::MAX);

        config.admission.staleness_window_seconds = admission::MAX_STALENESS_WINDOW_SECONDS;
        assert!(config.validate().is_ok());
        assert_eq!(config.admission.staleness_window(), chrono::Duration::weeks(1));
    }
}
