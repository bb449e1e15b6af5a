//! Audit trail listing.

use axum::Json;
use axum::extract::State;

use keygate_entity::audit::ApiLogView;

use crate::error::ApiError;
use crate::extractors::AdminUser;
use crate::state::AppState;

/// GET /api/logs
pub async fn recent_logs(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<ApiLogView>>, ApiError> {
    let limit = state.config.admission.log_list_limit;
    Ok(Json(state.audit.recent(limit).await?))
}
