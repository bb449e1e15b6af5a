//! Dashboard statistics handler.

use axum::Json;
use axum::extract::State;

use keygate_service::DashboardStats;

use crate::error::ApiError;
use crate::extractors::AdminUser;
use crate::state::AppState;

/// GET /api/stats
pub async fn dashboard(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.stats.dashboard(&admin).await?))
}
