//! # keygate-api
//!
//! HTTP API layer for KeyGate built on Axum.
//!
//! Serves the mod-menu client endpoints (`/connect`, `/disconnect`,
//! `/api/validate`) next to the bearer-authenticated admin surface.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
