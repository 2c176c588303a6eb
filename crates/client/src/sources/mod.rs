//! Source adapters producing paste candidates.
//!
//! Three adapters exist:
//! - [`ArchiveSource`] scans the paste site's recent-pastes listing.
//! - [`DuckDuckGoSource`] and [`GoogleSource`] run a site-scoped web search.
//!
//! Adapters never panic on bad markup; any failure is reported as a
//! [`SourceError`] and the aggregator continues with the other sources.

pub mod archive;
pub mod duckduckgo;
pub mod error;
pub mod google;

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use scraper::Selector;
use serde::Serialize;

use pastehunt_core::{AppConfig, Candidate, MatchKind, PasteId, SearchMode, SnippetHint, SourceKind, types::ARCHIVE_DOMAIN};

use crate::fetch::unwrap_redirect;
use crate::snippet::{clean_engine_snippet, contains_ignore_case, is_placeholder_snippet};

pub use archive::{ArchiveListing, ArchiveSource, ListingEntry};
pub use duckduckgo::DuckDuckGoSource;
pub use error::SourceError;
pub use google::GoogleSource;

/// Per-request limits handed to every adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// How many archive entries may have their content inspected.
    pub max_content_checks: usize,
}

impl SearchLimits {
    pub fn for_mode(mode: SearchMode) -> Self {
        Self { max_content_checks: mode.max_content_checks() }
    }
}

/// Upstream locations, timeouts and size limits shared by the adapters.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub base_url: String,
    pub listing_timeout: Duration,
    pub engine_timeout: Duration,
    pub max_listing_bytes: usize,
}

impl From<&AppConfig> for SourceSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.archive_base_url.clone(),
            listing_timeout: config.listing_timeout(),
            engine_timeout: config.engine_timeout(),
            max_listing_bytes: config.max_listing_bytes,
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

/// A source of paste candidates for a query.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Candidates for `query`, in the order the source reported them.
    async fn fetch_candidates(&self, query: &str, limits: &SearchLimits) -> Result<Vec<Candidate>, SourceError>;
}

/// First entries of each listing section, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingSnapshot {
    pub archive: Vec<ListingEntry>,
    pub public: Vec<ListingEntry>,
}

/// Read access to the raw archive listing.
#[async_trait]
pub trait ListingInspector: Send + Sync {
    async fn snapshot(&self) -> Result<ListingSnapshot, SourceError>;
}

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

pub(crate) static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));

/// Engine query restricted to the paste site.
pub fn site_query(query: &str) -> String {
    format!("site:{} {}", ARCHIVE_DOMAIN, query.trim())
}

/// Turn one search engine result into a candidate.
///
/// Returns None when the link does not point at a paste view page.
pub(crate) fn engine_candidate(
    href: &str, title: &str, snippet: Option<&str>, query: &str, base_url: &str,
) -> Option<Candidate> {
    let target = unwrap_redirect(href)?;
    let id = PasteId::from_view_url(&target)?;

    let title = clean_engine_snippet(title);
    let text = snippet.map(clean_engine_snippet).filter(|s| !s.is_empty()).unwrap_or_else(|| title.clone());
    let hint = if is_placeholder_snippet(&text) { SnippetHint::Placeholder(text) } else { SnippetHint::Excerpt(text) };
    let kind = if contains_ignore_case(&title, query) { MatchKind::Title } else { MatchKind::Content };

    Some(Candidate { link: id.view_url(base_url), id, title, kind, hint })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_query() {
        assert_eq!(site_query("  api key "), "site:pastebin.com api key");
    }

    #[test]
    fn test_limits_for_mode() {
        assert_eq!(SearchLimits::for_mode(SearchMode::Fast).max_content_checks, 0);
        assert_eq!(SearchLimits::for_mode(SearchMode::Deep).max_content_checks, 20);
    }

    #[test]
    fn test_engine_candidate_title_match() {
        let candidate = engine_candidate(
            "https://pastebin.com/AbCd1234",
            "Password dump - Pastebin.com",
            Some("admin:hunter2"),
            "password",
            "https://pastebin.com",
        )
        .unwrap();

        assert_eq!(candidate.id.as_str(), "AbCd1234");
        assert_eq!(candidate.kind, MatchKind::Title);
        assert_eq!(candidate.hint, SnippetHint::Excerpt("admin:hunter2".into()));
        assert_eq!(candidate.link, "https://pastebin.com/AbCd1234");
    }

    #[test]
    fn test_engine_candidate_placeholder_snippet() {
        let candidate = engine_candidate(
            "/url?q=https://www.pastebin.com/AbCd1234&sa=U",
            "Untitled - Pastebin.com",
            Some("Pastebin.com is the number one paste tool since 2002."),
            "password",
            "https://pastebin.com",
        )
        .unwrap();

        assert_eq!(candidate.kind, MatchKind::Content);
        assert!(candidate.hint.is_placeholder());
        assert_eq!(candidate.link, "https://pastebin.com/AbCd1234");
    }

    #[test]
    fn test_engine_candidate_falls_back_to_title() {
        let candidate =
            engine_candidate("https://pastebin.com/AbCd1234", "notes", Some("   "), "x", "https://pastebin.com").unwrap();
        assert_eq!(candidate.hint.text(), "notes");
    }

    #[test]
    fn test_engine_candidate_rejects_non_paste_links() {
        let base = "https://pastebin.com";
        assert!(engine_candidate("https://pastebin.com/raw/AbCd1234", "t", None, "q", base).is_none());
        assert!(engine_candidate("https://pastebin.com/u/someone1", "t", None, "q", base).is_none());
        assert!(engine_candidate("https://example.com/AbCd1234", "t", None, "q", base).is_none());
        assert!(engine_candidate("/search?q=more", "t", None, "q", base).is_none());
    }
}
