//! Admin user management handlers.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use keygate_core::types::UserId;
use keygate_entity::user::User;

use crate::dto::request::UpdateUserRequest;
use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::{AdminUser, FormOrJson};
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list(&admin).await?))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<UserId>,
    FormOrJson(req): FormOrJson<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    req.validate()?;
    Ok(Json(state.users.update(&admin, id, req.into()).await?))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<UserId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.users.delete(&admin, id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
