use axum::Json;
use serde_json::{Value, json};

use crate::app::SERVICE_NAME;

/// Static description of the API.
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/search": "GET ?q=<query>&mode=<fast|balanced|deep> search recent and indexed pastes",
            "/health": "GET liveness probe",
            "/debug": "GET first entries of the archive listing",
        },
        "example": "/search?q=password&mode=balanced",
        "note": "Results come from the public archive listing first, then site-scoped web search. \
                 Identical searches within a cache window are served from memory.",
    }))
}
