//! DuckDuckGo fallback adapter.
//!
//! Uses the HTML-only endpoint at `https://html.duckduckgo.com/html/`, which
//! needs no JavaScript and tolerates automated requests better than most
//! engines. Result links are wrapped in `//duckduckgo.com/l/?uddg=` redirects.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use scraper::{Html, Selector};

use pastehunt_core::{Candidate, SourceKind};

use super::{SearchLimits, SourceAdapter, SourceError, SourceSettings, engine_candidate, selector, site_query};
use crate::fetch::{BodyLimit, FetchRequest, PageFetcher};

pub const ENDPOINT: &str = "https://html.duckduckgo.com/html/";

static RESULT: LazyLock<Selector> =
    LazyLock::new(|| selector("div.result:not(.result--ad), div.web-result:not(.result--ad)"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector(".result__a"));
static SNIPPET: LazyLock<Selector> = LazyLock::new(|| selector(".result__snippet"));
static ANOMALY: LazyLock<Selector> = LazyLock::new(|| selector(".anomaly-modal__title, form#challenge-form"));

/// Parse a DuckDuckGo HTML results page.
pub fn parse_results(html: &str, query: &str, base_url: &str) -> Result<Vec<Candidate>, SourceError> {
    let document = Html::parse_document(html);

    let mut candidates = Vec::new();
    for block in document.select(&RESULT) {
        let Some(title_el) = block.select(&TITLE).next() else {
            continue;
        };
        let Some(href) = title_el.value().attr("href") else {
            continue;
        };

        let title: String = title_el.text().collect();
        let snippet: Option<String> = block.select(&SNIPPET).next().map(|el| el.text().collect());

        if let Some(candidate) = engine_candidate(href, &title, snippet.as_deref(), query, base_url) {
            candidates.push(candidate);
        }
    }

    if candidates.is_empty() && document.select(&ANOMALY).next().is_some() {
        return Err(SourceError::Blocked { kind: SourceKind::DuckDuckGo });
    }

    Ok(candidates)
}

/// Site-scoped search through DuckDuckGo's HTML endpoint.
pub struct DuckDuckGoSource {
    fetcher: Arc<dyn PageFetcher>,
    settings: SourceSettings,
}

impl DuckDuckGoSource {
    pub fn new(fetcher: Arc<dyn PageFetcher>, settings: SourceSettings) -> Self {
        Self { fetcher, settings }
    }
}

#[async_trait]
impl SourceAdapter for DuckDuckGoSource {
    fn kind(&self) -> SourceKind {
        SourceKind::DuckDuckGo
    }

    async fn fetch_candidates(&self, query: &str, _limits: &SearchLimits) -> Result<Vec<Candidate>, SourceError> {
        let scoped = site_query(query);
        let request = FetchRequest::post_form(ENDPOINT, &[("q", scoped.as_str())], self.settings.engine_timeout)
            .with_limit(BodyLimit::Reject(self.settings.max_listing_bytes));

        let response = self.fetcher.fetch(request).await.map_err(|e| SourceError::fetch(SourceKind::DuckDuckGo, e))?;
        tracing::trace!(bytes = response.bytes.len(), "DuckDuckGo response received");

        parse_results(&response.text(), query, &self.settings.base_url)
    }
}
