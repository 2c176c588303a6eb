//! Snippet extraction around a query match.
//!
//! Matching is case-insensitive and works on characters rather than bytes,
//! so windows never split a multi-byte sequence.

/// Maximum display length of engine snippets and listing titles.
pub const MAX_SNIPPET_CHARS: usize = 200;

/// Boilerplate the paste site serves as its meta description.
const PLACEHOLDER_PHRASES: &[&str] =
    &["pastebin.com is the number one paste tool", "pastebin is a website where you can store text online"];

/// Characters of context kept on either side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub before: usize,
    pub after: usize,
}

impl Context {
    /// Context used when replacing a placeholder snippet.
    pub const ENRICHMENT: Context = Context { before: 80, after: 120 };

    /// Context used when scanning archive paste bodies.
    pub const DEEP_SCAN: Context = Context { before: 100, after: 150 };

    pub const fn new(before: usize, after: usize) -> Self {
        Self { before, after }
    }
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Character offset of the first case-insensitive occurrence of `needle`.
fn find_ignore_case(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window.iter().zip(needle).all(|(a, b)| chars_eq_ignore_case(*a, *b)))
}

/// Whether `haystack` contains `needle`, ignoring case.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return false;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Extract the text around the first match of `query` in `body`.
///
/// Newline runs inside the window become a single space. The window is
/// marked with `...` on each side where it was cut short.
pub fn extract(body: &str, query: &str, context: Context) -> Option<String> {
    let query: Vec<char> = query.trim().chars().collect();
    let body: Vec<char> = body.chars().collect();

    let start_of_match = find_ignore_case(&body, &query)?;
    let start = start_of_match.saturating_sub(context.before);
    let end = (start_of_match + query.len() + context.after).min(body.len());

    let mut snippet = String::with_capacity(end - start + 6);
    if start > 0 {
        snippet.push_str("...");
    }

    let mut in_break = false;
    for &c in &body[start..end] {
        if c == '\r' || c == '\n' {
            if !in_break {
                snippet.push(' ');
                in_break = true;
            }
        } else {
            snippet.push(c);
            in_break = false;
        }
    }

    if end < body.len() {
        snippet.push_str("...");
    }

    Some(snippet)
}

/// Collapse all whitespace runs into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_chars` characters, appending `...` when cut.
pub fn truncate_display(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

/// Normalize an engine snippet for display.
pub fn clean_engine_snippet(text: &str) -> String {
    truncate_display(&collapse_whitespace(text), MAX_SNIPPET_CHARS)
}

/// Whether a snippet is the paste site's generic description.
pub fn is_placeholder_snippet(text: &str) -> bool {
    let lowered = text.to_lowercase();
    PLACEHOLDER_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}
