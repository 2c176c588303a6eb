//! Aggregation orchestrator: archive first, fallback engines on demand.
//!
//! # Pipeline
//!
//! 1. Archive stage, always.
//! 2. Each fallback engine in order, only while the unique-hit count is below
//!    the sufficiency threshold.
//! 3. Enrichment of placeholder snippets over the merged set.
//! 4. Stable sort, title matches before content matches.
//!
//! A stage that errors, panics or outlives the request budget contributes
//! zero hits. [`Aggregator::run`] itself never fails.

pub mod context;
pub mod enrich;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time::Instant;

use pastehunt_core::{AppConfig, Candidate, SearchMode, SearchResult};

use crate::content::ContentFetcher;
use crate::sources::{SearchLimits, SourceAdapter, SourceError};

pub use context::{AggregationContext, dedup_hits, sort_hits};
pub use enrich::{EnrichReport, enrich_placeholders};

/// Thresholds and budgets for one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorSettings {
    /// Unique hits at which fallback engines are skipped (default: 5)
    pub sufficiency_threshold: usize,
    /// Raw fetches allowed for snippet enrichment (default: 5)
    pub max_enrich_fetches: usize,
    /// Wall-clock budget for the whole run (default: 25s)
    pub request_budget: Duration,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for AggregatorSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            sufficiency_threshold: config.sufficiency_threshold,
            max_enrich_fetches: config.max_enrich_fetches,
            request_budget: config.request_budget(),
        }
    }
}

/// Runs the staged search across all sources.
pub struct Aggregator {
    archive: Arc<dyn SourceAdapter>,
    engines: Vec<Arc<dyn SourceAdapter>>,
    content: ContentFetcher,
    settings: AggregatorSettings,
}

impl Aggregator {
    /// `engines` are consulted in the given order.
    pub fn new(
        archive: Arc<dyn SourceAdapter>, engines: Vec<Arc<dyn SourceAdapter>>, content: ContentFetcher,
        settings: AggregatorSettings,
    ) -> Self {
        Self { archive, engines, content, settings }
    }

    pub fn settings(&self) -> &AggregatorSettings {
        &self.settings
    }

    /// Run one aggregation. Upstream failures degrade the result, never fail it.
    pub async fn run(&self, query: &str, mode: SearchMode) -> SearchResult {
        let deadline = Instant::now() + self.settings.request_budget;
        let limits = SearchLimits::for_mode(mode);
        let mut ctx = AggregationContext::new();

        let candidates = run_stage(self.archive.as_ref(), query, &limits, deadline).await;
        let added = ctx.absorb(candidates, self.archive.kind());
        tracing::info!(source = %self.archive.kind(), added, total = ctx.len(), "stage complete");

        for engine in &self.engines {
            if ctx.len() >= self.settings.sufficiency_threshold {
                tracing::debug!(source = %engine.kind(), total = ctx.len(), "enough hits, skipping engine");
                break;
            }
            if Instant::now() >= deadline {
                tracing::warn!(source = %engine.kind(), "request budget exhausted, skipping engine");
                break;
            }

            let candidates = run_stage(engine.as_ref(), query, &limits, deadline).await;
            let added = ctx.absorb(candidates, engine.kind());
            tracing::info!(source = %engine.kind(), added, total = ctx.len(), "stage complete");
        }

        let mut hits = ctx.into_hits();

        let remaining = deadline.saturating_duration_since(Instant::now());
        let enrichment = enrich_placeholders(&self.content, query, &mut hits, self.settings.max_enrich_fetches);
        match tokio::time::timeout(remaining, enrichment).await {
            Ok(report) if report.attempted > 0 => {
                tracing::debug!(attempted = report.attempted, replaced = report.replaced, "enriched snippets");
            }
            Ok(_) => {}
            Err(_) => tracing::warn!("request budget exhausted during enrichment"),
        }

        sort_hits(&mut hits);

        tracing::info!(query_len = query.len(), mode = %mode, count = hits.len(), "aggregation complete");
        SearchResult { query: query.to_string(), mode, hits }
    }
}

/// Run one adapter, converting errors, panics and budget overruns into zero hits.
async fn run_stage(adapter: &dyn SourceAdapter, query: &str, limits: &SearchLimits, deadline: Instant) -> Vec<Candidate> {
    let kind = adapter.kind();
    let remaining = deadline.saturating_duration_since(Instant::now());
    let guarded = AssertUnwindSafe(adapter.fetch_candidates(query, limits)).catch_unwind();

    let outcome = match tokio::time::timeout(remaining, guarded).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(SourceError::Panicked { kind }),
        Err(_) => Err(SourceError::OverBudget { kind }),
    };

    match outcome {
        Ok(candidates) => {
            tracing::debug!(source = %kind, candidates = candidates.len(), "source returned candidates");
            candidates
        }
        Err(e) => {
            tracing::warn!(
                source = %kind,
                code = e.code(),
                transport = e.is_transport(),
                error = %e,
                "source failed, continuing without it"
            );
            Vec::new()
        }
    }
}
