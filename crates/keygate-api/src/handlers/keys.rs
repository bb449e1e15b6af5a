//! License key handlers.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use keygate_core::types::KeyId;
use keygate_entity::key::LicenseKey;

use crate::dto::request::{CreateKeyRequest, UpdateKeyRequest};
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::{AdminUser, AuthUser, FormOrJson};
use crate::state::AppState;

/// GET /api/keys
pub async fn list_keys(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<LicenseKey>>, ApiError> {
    Ok(Json(state.keys.list(&auth).await?))
}

/// POST /api/keys
pub async fn create_key(
    State(state): State<AppState>,
    auth: AuthUser,
    FormOrJson(req): FormOrJson<CreateKeyRequest>,
) -> Result<Json<LicenseKey>, ApiError> {
    req.validate()?;
    Ok(Json(state.keys.create(&auth, req.into()).await?))
}

/// PUT /api/keys/{id}
pub async fn update_key(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<KeyId>,
    FormOrJson(req): FormOrJson<UpdateKeyRequest>,
) -> Result<Json<LicenseKey>, ApiError> {
    req.validate()?;
    Ok(Json(state.keys.update(&admin, id, req.into()).await?))
}

/// DELETE /api/keys/{id}
pub async fn delete_key(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<KeyId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.keys.delete(&admin, id).await?;
    Ok(Json(MessageResponse::new("License key deleted successfully")))
}
