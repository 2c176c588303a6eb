//! Cache key generation for search results.

use sha2::{Digest, Sha256};

use crate::types::SearchMode;

/// Normalize a query for cache lookups: trimmed and lowercased.
///
/// Inner whitespace is kept as given; matching is a literal substring search,
/// so `"api  key"` and `"api key"` are different searches.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Compute the cache key for a search.
///
/// The time bucket is not part of the digest; entries carry their bucket so a
/// stale entry is replaced in place instead of lingering beside the fresh one.
pub fn compute_cache_key(query: &str, mode: SearchMode) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_query(query).as_bytes());
    hasher.update(b"\n");
    hasher.update(mode.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_cache_key("api key", SearchMode::Balanced);
        let hash2 = compute_cache_key("api key", SearchMode::Balanced);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_different_mode() {
        let fast = compute_cache_key("password", SearchMode::Fast);
        let deep = compute_cache_key("password", SearchMode::Deep);
        assert_ne!(fast, deep);
    }

    #[test]
    fn test_hash_normalizes_query() {
        let hash1 = compute_cache_key("  API Key ", SearchMode::Fast);
        let hash2 = compute_cache_key("api key", SearchMode::Fast);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_keeps_inner_whitespace() {
        let single = compute_cache_key("api key", SearchMode::Fast);
        let double = compute_cache_key("api  key", SearchMode::Fast);
        assert_ne!(single, double);
        assert_eq!(normalize_query("  API  Key\t"), "api  key");
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_cache_key("password", SearchMode::Balanced);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
