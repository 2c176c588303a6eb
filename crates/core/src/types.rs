//! Domain types for paste search.
//!
//! A [`Candidate`] is what a source adapter reports before deduplication; a
//! [`Hit`] is the deduplicated, caller-visible unit collected into a
//! [`SearchResult`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Error;

/// Domain whose pastes are searched.
pub const ARCHIVE_DOMAIN: &str = "pastebin.com";

static PASTE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{8}$").expect("invalid paste id pattern"));

/// Path segments that look like slugs but are never paste ids.
const RESERVED_SEGMENTS: &[&str] = &["settings", "messages", "register"];

/// Opaque identifier of a paste: an 8-character ASCII alphanumeric slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PasteId(String);

impl PasteId {
    /// Validate a bare slug.
    pub fn parse(slug: &str) -> Option<Self> {
        let slug = slug.trim();
        if !PASTE_ID_RE.is_match(slug) || RESERVED_SEGMENTS.contains(&slug.to_ascii_lowercase().as_str()) {
            return None;
        }
        Some(Self(slug.to_string()))
    }

    /// Recover an id from a site-relative href such as `/AbCd1234`.
    pub fn from_href(href: &str) -> Option<Self> {
        let path = href.split(['?', '#']).next().unwrap_or_default();
        Self::parse(path.trim_matches('/'))
    }

    /// Recover an id from an absolute pastebin "view" link.
    ///
    /// Raw-content links (`/raw/<id>`), profile links (`/u/<name>`), links on
    /// other hosts and any path with more than one segment are rejected.
    pub fn from_view_url(link: &str) -> Option<Self> {
        let url = Url::parse(link.trim()).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        let host = url.host_str()?.to_ascii_lowercase();
        if host.trim_start_matches("www.") != ARCHIVE_DOMAIN {
            return None;
        }

        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [slug] => Self::parse(slug),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Public view URL of this paste under `base` (e.g. `https://pastebin.com`).
    pub fn view_url(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.0)
    }

    /// Raw content URL of this paste under `base`.
    pub fn raw_url(&self, base: &str) -> String {
        format!("{}/raw/{}", base.trim_end_matches('/'), self.0)
    }
}

impl fmt::Display for PasteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the query matched. Title matches sort ahead of content matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Title,
    Content,
}

/// Which adapter produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Archive,
    DuckDuckGo,
    Google,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Archive => "archive",
            SourceKind::DuckDuckGo => "duckduckgo",
            SourceKind::Google => "google",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an adapter knows about the text around a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetHint {
    /// A real excerpt containing or describing the match.
    Excerpt(String),
    /// Only the listing title is known; the content was not verified.
    Title(String),
    /// The source's generic boilerplate; worth enriching.
    Placeholder(String),
}

impl SnippetHint {
    pub fn text(&self) -> &str {
        match self {
            SnippetHint::Excerpt(s) | SnippetHint::Title(s) | SnippetHint::Placeholder(s) => s,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            SnippetHint::Excerpt(s) | SnippetHint::Title(s) | SnippetHint::Placeholder(s) => s,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, SnippetHint::Placeholder(_))
    }
}

/// Cost profile of a search, controlling how many paste bodies the archive
/// adapter may download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Fast,
    #[default]
    Balanced,
    Deep,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Fast => "fast",
            SearchMode::Balanced => "balanced",
            SearchMode::Deep => "deep",
        }
    }

    /// Number of archive entries whose raw content may be inspected.
    pub fn max_content_checks(&self) -> usize {
        match self {
            SearchMode::Fast => 0,
            SearchMode::Balanced => 10,
            SearchMode::Deep => 20,
        }
    }
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(SearchMode::Fast),
            "balanced" => Ok(SearchMode::Balanced),
            "deep" => Ok(SearchMode::Deep),
            other => Err(Error::InvalidInput(format!("unknown mode: {other} (expected fast, balanced or deep)"))),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unverified, possibly duplicate hit reported by one adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: PasteId,
    pub title: String,
    pub link: String,
    pub kind: MatchKind,
    pub hint: SnippetHint,
}

/// Deduplicated, caller-visible search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub id: PasteId,
    pub link: String,
    pub snippet: String,
    pub kind: MatchKind,
    pub source: SourceKind,
    /// Snippet is generic boilerplate rather than text from the paste.
    pub placeholder: bool,
}

impl Hit {
    pub fn from_candidate(candidate: Candidate, source: SourceKind) -> Self {
        let placeholder = candidate.hint.is_placeholder();
        Self {
            id: candidate.id,
            link: candidate.link,
            snippet: candidate.hint.into_text(),
            kind: candidate.kind,
            source,
            placeholder,
        }
    }
}

/// Final ordered result of one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub query: String,
    pub mode: SearchMode,
    pub hits: Vec<Hit>,
}

impl SearchResult {
    pub fn empty(query: &str, mode: SearchMode) -> Self {
        Self { query: query.to_string(), mode, hits: Vec::new() }
    }

    pub fn count(&self) -> usize {
        self.hits.len()
    }
}
