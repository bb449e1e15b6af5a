//! CLI command definitions and dispatch.

pub mod admin;
pub mod key;
pub mod logs;
pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

use keygate_core::config::AppConfig;
use keygate_core::error::AppError;
use keygate_database::Stores;

use crate::output::OutputFormat;

/// KeyGate: license keys and mod-menu session admission
#[derive(Debug, Parser)]
#[command(name = "keygate", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the KeyGate server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Admin account management
    Admin(admin::AdminArgs),
    /// License key management
    Key(key::KeyArgs),
    /// Audit trail
    Logs(logs::LogsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Admin(args) => admin::execute(args, &self.config).await,
            Commands::Key(args) => key::execute(args, &self.config, self.format).await,
            Commands::Logs(args) => logs::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load and validate configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    let config = AppConfig::from_file(config_path)?;
    config.validate()?;
    Ok(config)
}

/// Helper: open the configured stores
pub async fn open_stores(config: &AppConfig) -> Result<Stores, AppError> {
    Stores::from_config(config).await
}
