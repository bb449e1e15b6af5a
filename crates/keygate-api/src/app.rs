//! Application builder: wires router, state, and the background scheduler.

use std::net::SocketAddr;

use axum::Router;

use keygate_core::config::AppConfig;
use keygate_core::error::AppError;
use keygate_database::Stores;
use keygate_database::migration::run_migrations;
use keygate_worker::{ReclaimJob, ReclaimScheduler};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the KeyGate server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting KeyGate server...");

    // ── Step 1: Open stores ──────────────────────────────────────
    tracing::info!(provider = %config.store.provider, "Opening stores");
    let stores = Stores::from_config(&config).await?;
    if let Some(db) = stores.database.as_ref() {
        run_migrations(db.pool()).await?;
    }

    // ── Step 2: Wire services ────────────────────────────────────
    let state = AppState::new(config.clone(), stores.clone());

    // ── Step 3: Background reclaim ───────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let job = ReclaimJob::new(state.reclaimer.clone());
        let mut scheduler = ReclaimScheduler::new(job, &config.worker).await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 4: Build and start HTTP server ──────────────────────
    let app = build_app(state);
    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("KeyGate server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 5: Tear down ────────────────────────────────────────
    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }
    if let Some(db) = stores.database.as_ref() {
        db.close().await;
    }

    tracing::info!("KeyGate server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
