//! Server start command.

use clap::Args;

use keygate_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override bind host
    #[arg(long)]
    pub host: Option<String>,
    /// Override bind port
    #[arg(short, long)]
    pub port: Option<u16>,
    /// Disable the background reclaim worker
    #[arg(long)]
    pub no_worker: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, config_path: &str) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.no_worker {
        config.worker.enabled = false;
    }

    keygate_api::run_server(config).await
}
