//! Audit trail commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use keygate_core::error::AppError;
use keygate_entity::audit::ApiLogView;

use crate::output::{self, OutputFormat};

/// Arguments for logs commands
#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Logs subcommand
    #[command(subcommand)]
    pub command: LogsCommand,
}

/// Logs subcommands
#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// Show the most recent audit entries, newest first
    Recent {
        /// Number of entries (defaults to admission.log_list_limit)
        #[arg(short, long)]
        limit: Option<i64>,
    },
}

/// Table row for an audit entry
#[derive(Debug, Serialize, Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "HWID")]
    hwid: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Response")]
    response: String,
    #[tabled(rename = "OK")]
    success: bool,
}

impl From<&ApiLogView> for LogRow {
    fn from(log: &ApiLogView) -> Self {
        Self {
            time: log.entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            endpoint: log.entry.endpoint.clone(),
            key: log.key_name.clone().unwrap_or_else(|| "-".to_string()),
            hwid: log.entry.hwid.clone().unwrap_or_else(|| "-".to_string()),
            ip: log.entry.ip_address.clone(),
            response: log.entry.response.clone(),
            success: log.entry.success,
        }
    }
}

/// Execute logs commands
pub async fn execute(
    args: &LogsArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let stores = super::open_stores(&config).await?;

    match &args.command {
        LogsCommand::Recent { limit } => {
            let limit = limit.unwrap_or(config.admission.log_list_limit);
            let logs = stores.audit.recent(limit).await?;
            let rows: Vec<LogRow> = logs.iter().map(LogRow::from).collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}
