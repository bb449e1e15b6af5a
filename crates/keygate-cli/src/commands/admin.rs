//! Admin account commands.

use clap::{Args, Subcommand};

use keygate_auth::password::{PasswordHasher, PasswordValidator};
use keygate_core::error::AppError;
use keygate_entity::user::{CreateUser, UserRole};

use crate::output;

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Admin subcommand
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create a new admin account
    Create {
        /// Username
        #[arg(short, long)]
        username: Option<String>,
        /// Email
        #[arg(short, long)]
        email: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

/// Execute admin commands
pub async fn execute(args: &AdminArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let stores = super::open_stores(&config).await?;

    match &args.command {
        AdminCommand::Create {
            username,
            email,
            password,
        } => {
            let username = match username {
                Some(u) => u.clone(),
                None => prompt("Admin username")?,
            };
            let email = match email {
                Some(e) => e.clone(),
                None => prompt("Admin email")?,
            };
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Admin password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            PasswordValidator::new(&config.auth).validate(&password)?;
            if stores.users.find_by_email(&email).await?.is_some() {
                return Err(AppError::conflict("User already exists"));
            }
            let password_hash = PasswordHasher::new().hash_password(&password)?;

            let user = stores
                .users
                .create(CreateUser {
                    username: username.clone(),
                    email,
                    password_hash,
                    role: UserRole::Admin,
                })
                .await?;

            output::print_success(&format!(
                "Admin user '{}' created (id: {})",
                username, user.id
            ));
        }
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String, AppError> {
    dialoguer::Input::new()
        .with_prompt(label)
        .interact_text()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
