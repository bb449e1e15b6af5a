//! License key commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use keygate_core::error::AppError;
use keygate_core::types::KeyId;
use keygate_entity::key::{KeyStatus, KeyType, KeyUpdate, LicenseKey};
use keygate_service::{KeyLockRegistry, KeyService, NewKey};

use crate::output::{self, OutputFormat};

/// Arguments for key commands
#[derive(Debug, Args)]
pub struct KeyArgs {
    /// Key subcommand
    #[command(subcommand)]
    pub command: KeyCommand,
}

/// Key subcommands
#[derive(Debug, Subcommand)]
pub enum KeyCommand {
    /// Issue a new key
    Create {
        /// Display name, also accepted as a credential by clients
        #[arg(short, long)]
        name: String,
        /// basic (30 days), premium (90 days) or lifetime
        #[arg(short = 't', long, default_value = "basic")]
        key_type: String,
        /// Concurrent device cap
        #[arg(short, long, default_value_t = 1)]
        max_users: i32,
    },
    /// List every key
    List,
    /// Change a key's status
    SetStatus {
        /// Key id
        id: Uuid,
        /// active, suspended or expired
        status: String,
    },
    /// Delete a key with its sessions and audit entries
    Delete {
        /// Key id
        id: Uuid,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Table row for a key
#[derive(Debug, Serialize, Tabled)]
struct KeyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Key")]
    secret: String,
    #[tabled(rename = "Type")]
    key_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Users")]
    users: String,
    #[tabled(rename = "Expires")]
    expires: String,
}

impl From<&LicenseKey> for KeyRow {
    fn from(key: &LicenseKey) -> Self {
        Self {
            id: key.id.to_string(),
            name: key.key_name.clone(),
            secret: key.secret.clone(),
            key_type: key.key_type.to_string(),
            status: key.status.to_string(),
            users: format!("{}/{}", key.current_users, key.max_users),
            expires: key
                .expires_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string()),
        }
    }
}

/// Execute key commands
pub async fn execute(
    args: &KeyArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let stores = super::open_stores(&config).await?;

    match &args.command {
        KeyCommand::Create {
            name,
            key_type,
            max_users,
        } => {
            let service = KeyService::new(stores.keys.clone(), KeyLockRegistry::new());
            let key = service
                .issue(
                    None,
                    NewKey {
                        key_name: name.clone(),
                        key_type: key_type.parse::<KeyType>()?,
                        max_users: Some(*max_users),
                        status: None,
                    },
                )
                .await?;

            output::print_success(&format!("Key '{}' issued", key.key_name));
            output::print_kv("ID", &key.id.to_string());
            output::print_kv("Key", &key.secret);
            output::print_kv("Type", &key.key_type.to_string());
            output::print_kv("Max users", &key.max_users.to_string());
            output::print_kv(
                "Expires",
                &key.expires_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string()),
            );
        }
        KeyCommand::List => {
            let keys = stores.keys.list_all().await?;
            let rows: Vec<KeyRow> = keys.iter().map(KeyRow::from).collect();
            output::print_list(&rows, format);
        }
        KeyCommand::SetStatus { id, status } => {
            let status = status.parse::<KeyStatus>()?;
            let update = KeyUpdate {
                status: Some(status),
                ..Default::default()
            };
            let key = stores
                .keys
                .update(KeyId::from(*id), update)
                .await?
                .ok_or_else(|| AppError::not_found("License key not found"))?;
            output::print_success(&format!("Key '{}' is now {}", key.key_name, key.status));
        }
        KeyCommand::Delete { id, force } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt("Delete this key, its sessions and its audit entries?")
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;
                if !confirm {
                    println!("Aborted.");
                    return Ok(());
                }
            }
            if !stores.keys.delete(KeyId::from(*id)).await? {
                return Err(AppError::not_found("License key not found"));
            }
            output::print_success("License key deleted successfully");
        }
    }
    Ok(())
}
