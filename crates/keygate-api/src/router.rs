//! Route definitions for the KeyGate HTTP API.
//!
//! Client endpoints are mounted both at the root and under `/api` because
//! deployed mod menus call either form. Admin endpoints live under `/api`.

use std::time::Duration;

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors = build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new()
        .merge(client_api_routes())
        .merge(auth_routes())
        .merge(key_routes())
        .merge(user_routes())
        .merge(admin_routes())
        .merge(info_routes());

    Router::new()
        .merge(client_root_routes())
        .nest("/api", api_routes)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Legacy root aliases used by mod menus
fn client_root_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/connect",
            post(handlers::client::connect).get(handlers::info::connect_usage),
        )
        .route("/disconnect", post(handlers::client::disconnect))
}

/// Client endpoints under /api
fn client_api_routes() -> Router<AppState> {
    Router::new()
        .route("/connect", post(handlers::client::connect))
        .route("/disconnect", post(handlers::client::disconnect))
        .route("/validate", post(handlers::client::validate))
}

/// Register, login, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

/// License key CRUD
fn key_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/keys",
            get(handlers::keys::list_keys).post(handlers::keys::create_key),
        )
        .route(
            "/keys/{id}",
            put(handlers::keys::update_key).delete(handlers::keys::delete_key),
        )
}

/// Admin user management
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::users::list_users))
        .route(
            "/users/{id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
}

/// Dashboard stats and audit trail
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::stats::dashboard))
        .route("/logs", get(handlers::logs::recent_logs))
}

/// Health and API description
fn info_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/status", get(handlers::info::api_status))
}
