//! Structured errors for the pastehunt HTTP API.
//!
//! Input errors map to 400 with an empty result list so clients can treat
//! the body uniformly; everything else maps to 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use pastehunt_core::Error;

/// Errors returned by route handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed request parameters.
    #[error("{0}")]
    InvalidInput(String),

    /// An upstream dependency failed and the route has no degraded answer.
    #[error("{0}")]
    Upstream(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::InvalidInput(msg),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg, "results": [] }))).into_response()
            }
            ApiError::Upstream(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}
