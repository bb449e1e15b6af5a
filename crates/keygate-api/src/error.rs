//! Maps domain errors to HTTP responses.
//!
//! Two body shapes exist: the admin surface answers `{ "message": ... }`,
//! while the client admission surface answers `{ "status": false, "reason": ... }`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use keygate_core::error::{AppError, ErrorKind};
use keygate_service::AdmissionError;
use keygate_service::admission::ErrorCategory;

/// Admin surface error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    /// Human-readable message.
    pub message: String,
}

/// Client surface error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonBody {
    /// Always `false`.
    pub status: bool,
    /// Client-facing reason string.
    pub reason: String,
}

/// Error returned by admin handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let message = err
            .field_errors()
            .values()
            .flat_map(|errors| errors.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| err.to_string());
        Self(AppError::validation(message))
    }
}

impl ApiError {
    /// HTTP status for an error kind.
    pub fn status_for(kind: ErrorKind) -> StatusCode {
        match kind {
            ErrorKind::Validation | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Authorization => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = Self::status_for(err.kind);
        let message = if err.kind.is_internal() {
            tracing::error!(kind = %err.kind, error = %err.message, source = ?err.source, "Internal server error");
            "Internal server error".to_string()
        } else {
            err.message
        };
        (status, Json(MessageBody { message })).into_response()
    }
}

/// Error returned by the client admission handlers.
#[derive(Debug)]
pub struct ClientError(pub AdmissionError);

impl From<AdmissionError> for ClientError {
    fn from(err: AdmissionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        let status = match self.0.category() {
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::Auth => StatusCode::UNAUTHORIZED,
            ErrorCategory::Capacity => StatusCode::TOO_MANY_REQUESTS,
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ReasonBody {
            status: false,
            reason: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
