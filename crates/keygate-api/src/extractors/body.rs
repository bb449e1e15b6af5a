//! Body extractor accepting either urlencoded forms or JSON.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use keygate_core::error::AppError;

use crate::error::ApiError;

/// Deserializes the body as JSON when the content type says so, and as
/// `application/x-www-form-urlencoded` otherwise.
///
/// Mod-menu clients post forms, often without a content type; dashboards
/// post JSON. Both use the same field names.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormOrJson<T>(pub T);

impl<T, S> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(format!("Failed to read request body: {e}")))?;

        let value = if is_json {
            serde_json::from_slice(&bytes)
                .map_err(|e| AppError::validation(format!("Invalid JSON body: {e}")))?
        } else {
            serde_urlencoded::from_bytes(&bytes)
                .map_err(|e| AppError::validation(format!("Invalid form body: {e}")))?
        };
        Ok(Self(value))
    }
}
