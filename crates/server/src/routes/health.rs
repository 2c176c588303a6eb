use axum::Json;
use serde::Serialize;

use crate::app::SERVICE_NAME;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    /// Unix seconds.
    timestamp: i64,
}

/// Liveness probe. Touches no upstream.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok", service: SERVICE_NAME, timestamp: chrono::Utc::now().timestamp() })
}
