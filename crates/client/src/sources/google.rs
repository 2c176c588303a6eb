//! Google fallback adapter.
//!
//! Google blocks automated access aggressively, so it runs last. Result
//! blocks are `div.g`; the snippet class has changed several times, so a list
//! of known selectors is tried in order.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use scraper::{Html, Selector};

use pastehunt_core::{Candidate, SourceKind};

use super::{ANCHOR, SearchLimits, SourceAdapter, SourceError, SourceSettings, engine_candidate, selector, site_query};
use crate::fetch::{BodyLimit, FetchRequest, PageFetcher};

pub const ENDPOINT: &str = "https://www.google.com/search";

/// Results requested per page.
const RESULTS_PER_PAGE: &str = "20";

static RESULT: LazyLock<Selector> = LazyLock::new(|| selector("div.g"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h3"));
static SNIPPETS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["span.aCOpRe", "div.IsZvec", "div.VwiC3b", "span.st"].into_iter().map(selector).collect()
});

fn is_blocked(html: &str, final_path: &str) -> bool {
    final_path.starts_with("/sorry") || html.contains("unusual traffic from your computer network")
}

/// Parse a Google results page.
pub fn parse_results(html: &str, query: &str, base_url: &str) -> Result<Vec<Candidate>, SourceError> {
    let document = Html::parse_document(html);

    let mut candidates = Vec::new();
    for block in document.select(&RESULT) {
        let Some(href) = block.select(&ANCHOR).next().and_then(|a| a.value().attr("href")) else {
            continue;
        };

        let title: String = block.select(&TITLE).next().map(|el| el.text().collect()).unwrap_or_default();
        let snippet: Option<String> = SNIPPETS
            .iter()
            .filter_map(|sel| block.select(sel).next())
            .map(|el| el.text().collect::<String>())
            .find(|text| !text.trim().is_empty());

        if let Some(candidate) = engine_candidate(href, &title, snippet.as_deref(), query, base_url) {
            candidates.push(candidate);
        }
    }

    Ok(candidates)
}

/// Site-scoped search through Google's results page.
pub struct GoogleSource {
    fetcher: Arc<dyn PageFetcher>,
    settings: SourceSettings,
}

impl GoogleSource {
    pub fn new(fetcher: Arc<dyn PageFetcher>, settings: SourceSettings) -> Self {
        Self { fetcher, settings }
    }
}

#[async_trait]
impl SourceAdapter for GoogleSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Google
    }

    async fn fetch_candidates(&self, query: &str, _limits: &SearchLimits) -> Result<Vec<Candidate>, SourceError> {
        let scoped = site_query(query);
        let request = FetchRequest::get(ENDPOINT, self.settings.engine_timeout)
            .with_query(&[("q", scoped.as_str()), ("num", RESULTS_PER_PAGE)])
            .with_limit(BodyLimit::Reject(self.settings.max_listing_bytes));

        let response = self.fetcher.fetch(request).await.map_err(|e| SourceError::fetch(SourceKind::Google, e))?;
        let html = response.text();

        if is_blocked(&html, response.final_url.path()) {
            return Err(SourceError::Blocked { kind: SourceKind::Google });
        }

        parse_results(&html, query, &self.settings.base_url)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::testing::FakeFetcher;
    use pastehunt_core::MatchKind;

    pub(crate) fn results_html(results: &[(&str, &str, &str)]) -> String {
        let blocks: String = results
            .iter()
            .map(|(href, title, snippet)| {
                format!(
                    r#"<div class="g"><div class="yuRUbf"><a href="{href}"><h3>{title}</h3></a></div>
                    <div class="VwiC3b">{snippet}</div></div>"#
                )
            })
            .collect();
        format!(r#"<html><body><div id="search">{blocks}</div></body></html>"#)
    }

    #[test]
    fn test_parse_results() {
        let html = results_html(&[
            ("/url?q=https://pastebin.com/AbCd1234&sa=U", "Password list - Pastebin.com", "root:toor"),
            ("https://pastebin.com/EfGh5678", "dump - Pastebin.com", "smtp password\n  inside"),
        ]);

        let candidates = parse_results(&html, "password", "https://pastebin.com").unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id.as_str(), "AbCd1234");
        assert_eq!(candidates[0].kind, MatchKind::Title);
        assert_eq!(candidates[1].kind, MatchKind::Content);
        assert_eq!(candidates[1].hint.text(), "smtp password inside");
    }

    #[test]
    fn test_parse_results_snippet_selector_order() {
        let html = r#"<html><body><div class="g"><a href="https://pastebin.com/AbCd1234"><h3>t</h3></a>
            <span class="st">old style</span><div class="IsZvec">  </div><span class="aCOpRe">newest style</span></div></body></html>"#;

        let candidates = parse_results(html, "x", "https://pastebin.com").unwrap();
        assert_eq!(candidates[0].hint.text(), "newest style");
    }

    #[test]
    fn test_parse_results_title_fallback() {
        let html = r#"<html><body><div class="g"><a href="https://pastebin.com/AbCd1234"><h3>secret notes</h3></a></div></body></html>"#;

        let candidates = parse_results(html, "x", "https://pastebin.com").unwrap();
        assert_eq!(candidates[0].hint.text(), "secret notes");
    }

    #[test]
    fn test_parse_results_truncates_long_snippets() {
        let long = "word ".repeat(100);
        let html = results_html(&[("https://pastebin.com/AbCd1234", "t", &long)]);

        let candidates = parse_results(&html, "x", "https://pastebin.com").unwrap();
        let text = candidates[0].hint.text();
        assert!(text.ends_with("..."));
        assert_eq!(text.chars().count(), 203);
    }

    #[test]
    fn test_is_blocked() {
        assert!(is_blocked("", "/sorry/index"));
        assert!(is_blocked("Our systems have detected unusual traffic from your computer network.", "/search"));
        assert!(!is_blocked("<html></html>", "/search"));
    }

    #[tokio::test]
    async fn test_fetch_sends_site_query() {
        let html = results_html(&[("https://pastebin.com/AbCd1234", "t", "s")]);
        let fetcher = Arc::new(FakeFetcher::new().page(ENDPOINT, &html));
        let source = GoogleSource::new(fetcher.clone(), SourceSettings::default());

        let candidates = source.fetch_candidates("token", &SearchLimits { max_content_checks: 0 }).await.unwrap();
        assert_eq!(candidates.len(), 1);

        let requests = fetcher.requests();
        assert_eq!(
            requests[0].query,
            vec![("q".to_string(), "site:pastebin.com token".to_string()), ("num".to_string(), "20".to_string())]
        );
    }

    #[tokio::test]
    async fn test_captcha_page_is_blocked() {
        let fetcher = Arc::new(FakeFetcher::new().page(ENDPOINT, "<p>unusual traffic from your computer network</p>"));
        let source = GoogleSource::new(fetcher, SourceSettings::default());

        let result = source.fetch_candidates("token", &SearchLimits { max_content_checks: 0 }).await;
        assert!(matches!(result, Err(SourceError::Blocked { kind: SourceKind::Google })));
    }
}
