//! pastehunt server entry point.
//!
//! Boots the HTTP API on the configured bind address. Logs are JSON on
//! stderr; `RUST_LOG` overrides the configured filter.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use pastehunt_client::SearchService;
use pastehunt_core::AppConfig;

mod app;
mod error;
mod routes;

/// Periodically drop cache entries from past buckets.
fn spawn_cache_janitor(service: Arc<SearchService>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await;
        loop {
            interval.tick().await;
            let purged = service.cache().purge_stale().await;
            if purged > 0 {
                tracing::debug!(purged, "purged stale search cache entries");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).json().init();

    let parts = SearchService::from_config(&config)?;
    let service = Arc::new(parts.service);
    spawn_cache_janitor(service.clone(), config.cache_settings().ttl);

    let state = app::AppState::new(service, parts.archive);
    let router = app::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(bind_addr = %config.bind_addr, "starting pastehunt server");

    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}
