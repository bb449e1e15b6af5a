//! Auth handlers: register, login, me.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use keygate_entity::user::User;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::AuthResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, FormOrJson};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    FormOrJson(req): FormOrJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    req.validate()?;
    let session = state.auth.register(req.into()).await?;
    Ok(Json(session.into()))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    FormOrJson(req): FormOrJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    req.validate()?;
    let session = state.auth.login(&req.email, &req.password).await?;
    Ok(Json(session.into()))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}
