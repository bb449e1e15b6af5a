//! KeyGate Server: license key issuance and mod-menu session admission.
//!
//! Main entry point that loads configuration, initializes logging and runs
//! the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use keygate_core::config::AppConfig;
use keygate_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `KEYGATE_CONFIG` or the layered defaults
fn load_configuration() -> Result<AppConfig, AppError> {
    let config = match std::env::var("KEYGATE_CONFIG") {
        Ok(path) => AppConfig::from_file(&path)?,
        Err(_) => {
            let env = std::env::var("KEYGATE_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)?
        }
    };
    config.validate()?;
    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting KeyGate v{}", env!("CARGO_PKG_VERSION"));
    keygate_api::run_server(config).await
}
