//! Replace placeholder snippets with text from the paste itself.

use futures::future::join_all;

use pastehunt_core::{Hit, PasteId};

use crate::content::ContentFetcher;
use crate::snippet::{Context, extract};

/// Outcome of one enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
    /// Raw bodies fetched.
    pub attempted: usize,
    /// Snippets replaced.
    pub replaced: usize,
}

/// Fetch up to `max_fetches` placeholder hits and swap in a real excerpt.
///
/// A hit whose fetch fails or whose body lacks the query keeps its original snippet.
pub async fn enrich_placeholders(content: &ContentFetcher, query: &str, hits: &mut [Hit], max_fetches: usize) -> EnrichReport {
    let targets: Vec<usize> =
        hits.iter().enumerate().filter(|(_, hit)| hit.placeholder).map(|(i, _)| i).take(max_fetches).collect();

    if targets.is_empty() {
        return EnrichReport::default();
    }

    let ids: Vec<PasteId> = targets.iter().map(|&i| hits[i].id.clone()).collect();
    let bodies = join_all(ids.iter().map(|id| content.body(id))).await;

    let mut report = EnrichReport { attempted: targets.len(), replaced: 0 };
    for (i, body) in targets.into_iter().zip(bodies) {
        let hit = &mut hits[i];
        match body {
            Ok(body) => {
                if let Some(excerpt) = extract(&body, query, Context::ENRICHMENT) {
                    hit.snippet = excerpt;
                    hit.placeholder = false;
                    report.replaced += 1;
                }
            }
            Err(e) => tracing::debug!(paste_id = %hit.id, error = %e, "enrichment fetch failed"),
        }
    }

    report
}
