//! Mod-menu client endpoints: connect, disconnect, validate.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::request::{ConnectBody, DisconnectBody, ValidateBody};
use crate::dto::response::{ConnectResponse, StatusResponse, ValidateResponse};
use crate::error::ClientError;
use crate::extractors::{ClientMeta, FormOrJson};
use crate::state::AppState;

/// POST /connect, POST /api/connect
pub async fn connect(
    State(state): State<AppState>,
    ClientMeta(client): ClientMeta,
    FormOrJson(body): FormOrJson<ConnectBody>,
) -> Result<Json<ConnectResponse>, ClientError> {
    let grant = state.admission.connect(body.into_request(client)).await?;
    Ok(Json(grant.into()))
}

/// POST /disconnect, POST /api/disconnect
pub async fn disconnect(
    State(state): State<AppState>,
    ClientMeta(client): ClientMeta,
    FormOrJson(body): FormOrJson<DisconnectBody>,
) -> Result<Json<StatusResponse>, ClientError> {
    state.admission.disconnect(body.into_request(client)).await?;
    Ok(Json(StatusResponse::ok()))
}

/// POST /api/validate
pub async fn validate(
    State(state): State<AppState>,
    FormOrJson(body): FormOrJson<ValidateBody>,
) -> (StatusCode, Json<ValidateResponse>) {
    match state.admission.validate(body.key).await {
        Ok(validation) => (StatusCode::OK, Json(validation.into())),
        Err(e) => {
            tracing::error!(error = %e, "Key validation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ValidateResponse::failed()),
            )
        }
    }
}
