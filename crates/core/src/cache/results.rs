//! Search result cache operations.
//!
//! Provides functions for caching and retrieving aggregated search results.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::clock::{Clock, SystemClock};
use super::hash::compute_cache_key;
use crate::types::{SearchMode, SearchResult};

/// Sizing and expiry of the result cache.
#[derive(Debug, Clone, Copy)]
pub struct CacheSettings {
    /// Bucket width (default: 300s)
    pub ttl: Duration,
    /// Maximum number of entries (default: 128)
    pub capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl: Duration::from_secs(300), capacity: 128 }
    }
}

/// A cached search result and the bucket it was computed in.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub bucket: u64,
    pub value: SearchResult,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Keys in insertion order, oldest first.
    order: VecDeque<String>,
}

impl CacheState {
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key.to_string());
    }
}

/// Bounded, bucketed cache of search results.
///
/// Reads share a `tokio::sync::RwLock`; writes take it exclusively.
#[derive(Debug)]
pub struct ResultCache {
    state: RwLock<CacheState>,
    settings: CacheSettings,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    /// Create a cache driven by the wall clock.
    pub fn new(settings: CacheSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: CacheSettings, clock: Arc<dyn Clock>) -> Self {
        Self { state: RwLock::new(CacheState::default()), settings, clock }
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Index of the current time bucket.
    pub fn bucket(&self) -> u64 {
        self.clock.now_unix() / self.settings.ttl.as_secs().max(1)
    }

    /// Get the cached result for `(query, mode)` in the current bucket.
    ///
    /// Returns None on a miss or when the stored entry belongs to an earlier bucket.
    pub async fn get(&self, query: &str, mode: SearchMode) -> Option<SearchResult> {
        let key = compute_cache_key(query, mode);
        let bucket = self.bucket();

        let state = self.state.read().await;
        match state.entries.get(&key) {
            Some(entry) if entry.bucket == bucket => Some(entry.value.clone()),
            Some(entry) => {
                tracing::debug!(stale_bucket = entry.bucket, bucket, "stale search cache entry");
                None
            }
            None => None,
        }
    }

    /// Insert or replace the result for `(query, mode)` computed in `bucket`.
    ///
    /// When the cache is full and the key is new, the least-recently-inserted
    /// entry is evicted first.
    pub async fn put(&self, query: &str, mode: SearchMode, bucket: u64, result: SearchResult) {
        let key = compute_cache_key(query, mode);
        let created_at = DateTime::from_timestamp(self.clock.now_unix() as i64, 0).unwrap_or_default();

        let mut state = self.state.write().await;

        if !state.entries.contains_key(&key) {
            while state.entries.len() >= self.settings.capacity.max(1) {
                let Some(oldest) = state.order.pop_front() else {
                    break;
                };
                state.entries.remove(&oldest);
                tracing::debug!(capacity = self.settings.capacity, "evicted oldest search cache entry");
            }
        }

        state.touch(&key);
        state.entries.insert(key, CacheEntry { bucket, value: result, created_at });
    }

    /// Delete entries from earlier buckets.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_stale(&self) -> usize {
        let bucket = self.bucket();
        let mut state = self.state.write().await;

        let before = state.entries.len();
        state.entries.retain(|_, entry| entry.bucket == bucket);
        let CacheState { entries, order } = &mut *state;
        order.retain(|key| entries.contains_key(key));

        before - state.entries.len()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
