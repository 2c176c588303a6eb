//! Recent-pastes archive adapter.
//!
//! The listing page carries two sections:
//! - the main `table.maintable`, one row per paste with the link in the first cell
//! - the "Public Pastes" sidebar, a `<ul>` of links near a `div.sidebar__title`
//!
//! Matching runs in two phases. Titles are matched first at no cost; then
//! untitled entries have the head of their raw content inspected, bounded
//! by the mode's content-check budget.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use futures::future::join_all;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use pastehunt_core::{Candidate, MatchKind, PasteId, SnippetHint, SourceKind};

use super::{ANCHOR, ListingInspector, ListingSnapshot, SearchLimits, SourceAdapter, SourceError, SourceSettings, selector};
use crate::content::ContentFetcher;
use crate::fetch::{BodyLimit, FetchRequest, PageFetcher};
use crate::snippet::{Context, MAX_SNIPPET_CHARS, collapse_whitespace, contains_ignore_case, extract, truncate_display};

/// Entries shown per section by [`ArchiveSource::snapshot`].
const SNAPSHOT_LIMIT: usize = 10;

static TABLE_ROW: LazyLock<Selector> = LazyLock::new(|| selector("table.maintable tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static SIDEBAR_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("div.sidebar__title"));
static LIST_LINK: LazyLock<Selector> = LazyLock::new(|| selector("li a[href]"));

/// One paste in the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub title: String,
    pub id: PasteId,
}

impl ListingEntry {
    /// Listed without a meaningful title, so only the content can match.
    pub fn is_untitled(&self) -> bool {
        let title = self.title.trim();
        title.is_empty() || title.eq_ignore_ascii_case("untitled")
    }
}

/// Both sections of the listing page, each deduplicated by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveListing {
    pub archive: Vec<ListingEntry>,
    pub public: Vec<ListingEntry>,
}

impl ArchiveListing {
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty() && self.public.is_empty()
    }

    /// All entries, main table first, with ids repeated across sections dropped.
    pub fn entries(&self) -> Vec<&ListingEntry> {
        let mut seen = HashSet::new();
        self.archive.iter().chain(&self.public).filter(|e| seen.insert(&e.id)).collect()
    }
}

fn entry_from_link(link: ElementRef<'_>) -> Option<ListingEntry> {
    let id = PasteId::from_href(link.value().attr("href")?)?;
    let title = collapse_whitespace(&link.text().collect::<String>());
    Some(ListingEntry { title, id })
}

fn dedup_entries(entries: impl Iterator<Item = ListingEntry>) -> Vec<ListingEntry> {
    let mut seen = HashSet::new();
    entries.filter(|e| seen.insert(e.id.clone())).collect()
}

fn table_entries(document: &Html) -> Vec<ListingEntry> {
    let rows = document.select(&TABLE_ROW).filter_map(|row| {
        let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
        if cells.len() < 2 {
            return None;
        }
        cells[0].select(&ANCHOR).next().and_then(entry_from_link)
    });
    dedup_entries(rows)
}

fn public_entries(document: &Html) -> Vec<ListingEntry> {
    let Some(title) = document
        .select(&SIDEBAR_TITLE)
        .find(|el| collapse_whitespace(&el.text().collect::<String>()).eq_ignore_ascii_case("public pastes"))
    else {
        return Vec::new();
    };

    let links_under = |el: ElementRef<'_>| dedup_entries(el.select(&LIST_LINK).filter_map(entry_from_link));

    let from_parent = title.parent().and_then(ElementRef::wrap).map(links_under).unwrap_or_default();
    if !from_parent.is_empty() {
        return from_parent;
    }

    title
        .ancestors()
        .flat_map(|node| node.next_siblings())
        .filter_map(ElementRef::wrap)
        .map(links_under)
        .find(|entries| !entries.is_empty())
        .unwrap_or_default()
}

/// Parse the listing page. Missing sections yield empty lists.
pub fn parse_listing(html: &str) -> ArchiveListing {
    let document = Html::parse_document(html);
    ArchiveListing { archive: table_entries(&document), public: public_entries(&document) }
}

/// Adapter over the site's archive listing.
pub struct ArchiveSource {
    fetcher: Arc<dyn PageFetcher>,
    content: ContentFetcher,
    settings: SourceSettings,
}

impl ArchiveSource {
    pub fn new(fetcher: Arc<dyn PageFetcher>, content: ContentFetcher, settings: SourceSettings) -> Self {
        Self { fetcher, content, settings }
    }

    fn listing_url(&self) -> String {
        format!("{}/archive", self.settings.base_url.trim_end_matches('/'))
    }

    /// Fetch and parse the listing page.
    pub async fn fetch_listing(&self) -> Result<ArchiveListing, SourceError> {
        let request = FetchRequest::get(self.listing_url(), self.settings.listing_timeout)
            .with_limit(BodyLimit::Reject(self.settings.max_listing_bytes));
        let response =
            self.fetcher.fetch(request).await.map_err(|e| SourceError::fetch(SourceKind::Archive, e))?;

        let listing = parse_listing(&response.text());
        tracing::debug!(
            archive = listing.archive.len(),
            public = listing.public.len(),
            fetch_ms = response.fetch_ms,
            "parsed archive listing"
        );
        Ok(listing)
    }

    fn title_candidate(&self, entry: &ListingEntry) -> Candidate {
        Candidate {
            id: entry.id.clone(),
            title: entry.title.clone(),
            link: entry.id.view_url(&self.settings.base_url),
            kind: MatchKind::Title,
            hint: SnippetHint::Title(truncate_display(&entry.title, MAX_SNIPPET_CHARS)),
        }
    }

    async fn content_candidates(&self, entries: &[&ListingEntry], query: &str) -> Vec<Candidate> {
        let peeks = join_all(entries.iter().map(|entry| self.content.peek(&entry.id))).await;

        entries
            .iter()
            .zip(peeks)
            .filter_map(|(entry, peek)| match peek {
                Ok(body) => extract(&body, query, Context::DEEP_SCAN).map(|excerpt| Candidate {
                    id: entry.id.clone(),
                    title: entry.title.clone(),
                    link: entry.id.view_url(&self.settings.base_url),
                    kind: MatchKind::Content,
                    hint: SnippetHint::Excerpt(excerpt),
                }),
                Err(e) => {
                    tracing::debug!(paste_id = %entry.id, error = %e, "content check failed");
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl SourceAdapter for ArchiveSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Archive
    }

    async fn fetch_candidates(&self, query: &str, limits: &SearchLimits) -> Result<Vec<Candidate>, SourceError> {
        let listing = self.fetch_listing().await?;
        if listing.is_empty() {
            return Err(SourceError::shape(SourceKind::Archive, "listing has no paste entries"));
        }

        let (titled, rest): (Vec<&ListingEntry>, Vec<&ListingEntry>) =
            listing.entries().into_iter().partition(|e| contains_ignore_case(&e.title, query));
        let mut candidates: Vec<Candidate> = titled.iter().map(|e| self.title_candidate(e)).collect();

        let untitled: Vec<&ListingEntry> = rest.into_iter().filter(|e| e.is_untitled()).collect();
        let budget = limits.max_content_checks.min(untitled.len());
        if untitled.len() > budget {
            tracing::debug!(skipped = untitled.len() - budget, budget, "content-check budget exhausted");
        }

        candidates.extend(self.content_candidates(&untitled[..budget], query).await);

        tracing::debug!(
            title_matches = titled.len(),
            content_checks = budget,
            candidates = candidates.len(),
            "archive scan complete"
        );
        Ok(candidates)
    }
}

#[async_trait]
impl ListingInspector for ArchiveSource {
    async fn snapshot(&self) -> Result<ListingSnapshot, SourceError> {
        let listing = self.fetch_listing().await?;
        Ok(ListingSnapshot {
            archive: listing.archive.into_iter().take(SNAPSHOT_LIMIT).collect(),
            public: listing.public.into_iter().take(SNAPSHOT_LIMIT).collect(),
        })
    }
}
