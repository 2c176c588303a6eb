//! Router assembly and shared state.

use std::sync::Arc;

use axum::Router;
use axum::http::Method;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use pastehunt_client::{ListingInspector, SearchService};

use crate::routes::{debug_handler, health_handler, index_handler, search_handler};

pub const SERVICE_NAME: &str = "pastehunt";

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
    pub inspector: Arc<dyn ListingInspector>,
}

impl AppState {
    pub fn new(service: Arc<SearchService>, inspector: Arc<dyn ListingInspector>) -> Self {
        Self { service, inspector }
    }
}

/// Build the HTTP router.
pub fn router(state: AppState) -> Router {
    // Read-only API, callable from any origin
    let cors = CorsLayer::new().allow_origin(Any).allow_methods([Method::GET]);

    Router::new()
        .route("/", get(index_handler))
        .route("/search", get(search_handler))
        .route("/health", get(health_handler))
        .route("/debug", get(debug_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
