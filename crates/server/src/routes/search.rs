//! `GET /search` handler.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use pastehunt_core::{SearchMode, SearchResult};

use crate::app::AppState;
use crate::error::ApiError;

/// Query string for `/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search text (required, non-blank).
    #[serde(default)]
    pub q: Option<String>,

    /// fast, balanced or deep (default: balanced).
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub link: String,
    pub snippet: String,
    pub paste_id: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub mode: SearchMode,
    pub count: usize,
    pub results: Vec<SearchHit>,
}

impl From<SearchResult> for SearchResponse {
    fn from(result: SearchResult) -> Self {
        let results: Vec<SearchHit> = result
            .hits
            .into_iter()
            .map(|hit| SearchHit { link: hit.link, snippet: hit.snippet, paste_id: hit.id.to_string() })
            .collect();
        Self { query: result.query, mode: result.mode, count: results.len(), results }
    }
}

pub async fn search_handler(
    State(state): State<AppState>, params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(ApiError::InvalidInput("query parameter 'q' is required".into()));
    }

    let mode = match params.mode.as_deref().map(str::trim) {
        None | Some("") => SearchMode::default(),
        Some(raw) => raw.parse::<SearchMode>()?,
    };

    tracing::info!(query_len = query.len(), mode = %mode, "search request");

    let result = state.service.search(query, mode).await?;
    Ok(Json(SearchResponse::from(result)))
}
