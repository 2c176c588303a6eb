//! URL canonicalization and search-engine redirect unwrapping.

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Canonicalize a URL string before fetching.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = url::Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str() {
        let host = host.to_lowercase();
        parsed
            .set_host(Some(&host))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Resolve the destination of a search-result href.
///
/// Handles protocol-relative links, DuckDuckGo's `//duckduckgo.com/l/?uddg=`
/// wrapper and Google's `/url?q=` wrapper. Other relative links yield None.
pub fn unwrap_redirect(href: &str) -> Option<String> {
    let href = href.trim();
    let full = if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with("/url?") {
        format!("https://www.google.com{href}")
    } else {
        href.to_string()
    };

    let parsed = url::Url::parse(&full).ok()?;
    let host = parsed.host_str().unwrap_or_default().trim_start_matches("www.");

    let wrapped_param = match (host, parsed.path()) {
        ("duckduckgo.com", path) if path.starts_with("/l/") => Some("uddg"),
        ("google.com", "/url") => Some("q"),
        _ => None,
    };

    match wrapped_param {
        Some(param) => parsed.query_pairs().find(|(key, _)| key == param).map(|(_, value)| value.into_owned()),
        None => Some(full),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_basic() {
        let url = canonicalize("https://pastebin.com/archive").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("pastebin.com"));
    }

    #[test]
    fn test_canonicalize_default_scheme() {
        let url = canonicalize("pastebin.com/raw/AbCd1234").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.path(), "/raw/AbCd1234");
    }

    #[test]
    fn test_canonicalize_lowercase_host() {
        let url = canonicalize("https://PASTEBIN.COM").unwrap();
        assert_eq!(url.host_str(), Some("pastebin.com"));
    }

    #[test]
    fn test_canonicalize_remove_fragment() {
        let url = canonicalize("https://pastebin.com/archive#top").unwrap();
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_canonicalize_preserve_query() {
        let url = canonicalize("https://www.google.com/search?q=site%3Apastebin.com+x&num=20").unwrap();
        assert_eq!(url.query(), Some("q=site%3Apastebin.com+x&num=20"));
    }

    #[test]
    fn test_canonicalize_unsupported_scheme() {
        let result = canonicalize("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_canonicalize_empty() {
        assert!(matches!(canonicalize(""), Err(UrlError::Empty)));
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_unwrap_duckduckgo_redirect() {
        let href = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fpastebin.com%2FAbCd1234&rut=abc";
        assert_eq!(unwrap_redirect(href).as_deref(), Some("https://pastebin.com/AbCd1234"));
    }

    #[test]
    fn test_unwrap_google_redirect() {
        let href = "/url?q=https://pastebin.com/AbCd1234&sa=U&ved=2ah";
        assert_eq!(unwrap_redirect(href).as_deref(), Some("https://pastebin.com/AbCd1234"));

        let href = "https://www.google.com/url?q=https://pastebin.com/ZzYy9876&sa=U";
        assert_eq!(unwrap_redirect(href).as_deref(), Some("https://pastebin.com/ZzYy9876"));
    }

    #[test]
    fn test_unwrap_direct_link() {
        let href = "https://pastebin.com/AbCd1234";
        assert_eq!(unwrap_redirect(href).as_deref(), Some(href));
    }

    #[test]
    fn test_unwrap_protocol_relative() {
        assert_eq!(unwrap_redirect("//pastebin.com/AbCd1234").as_deref(), Some("https://pastebin.com/AbCd1234"));
    }

    #[test]
    fn test_unwrap_relative_link_rejected() {
        assert!(unwrap_redirect("/search?q=more").is_none());
        assert!(unwrap_redirect("not-a-url").is_none());
    }
}
