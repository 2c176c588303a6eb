use axum::Json;
use axum::extract::State;
use serde::Serialize;

use pastehunt_client::ListingEntry;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct DebugResponse {
    status: &'static str,
    archive_pastes: Vec<ListingEntry>,
    public_pastes: Vec<ListingEntry>,
}

/// Live view of what the archive listing currently parses to.
pub async fn debug_handler(State(state): State<AppState>) -> Result<Json<DebugResponse>, ApiError> {
    let snapshot = state.inspector.snapshot().await.map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(Json(DebugResponse { status: "ok", archive_pastes: snapshot.archive, public_pastes: snapshot.public }))
}
