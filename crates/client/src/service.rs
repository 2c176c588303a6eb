//! Cached search entry point shared by the server and the CLI.

use std::sync::Arc;

use pastehunt_core::{AppConfig, Error, ResultCache, SearchMode, SearchResult};

use crate::aggregate::{Aggregator, AggregatorSettings, dedup_hits};
use crate::content::ContentFetcher;
use crate::fetch::{FetchClient, FetchConfig, PageFetcher};
use crate::sources::{ArchiveSource, DuckDuckGoSource, GoogleSource, SourceAdapter, SourceSettings};

/// Validates queries, consults the result cache and runs the aggregator on a miss.
pub struct SearchService {
    aggregator: Aggregator,
    cache: ResultCache,
}

/// The archive adapter and the service built around it.
///
/// The archive adapter is returned separately so callers can expose its
/// listing snapshot.
pub struct ServiceParts {
    pub service: SearchService,
    pub archive: Arc<ArchiveSource>,
}

impl SearchService {
    pub fn new(aggregator: Aggregator, cache: ResultCache) -> Self {
        Self { aggregator, cache }
    }

    /// Wire the live sources behind `fetcher`: archive, then DuckDuckGo, then Google.
    pub fn with_fetcher(config: &AppConfig, fetcher: Arc<dyn PageFetcher>) -> ServiceParts {
        let settings = SourceSettings::from(config);
        let content = ContentFetcher::new(fetcher.clone(), config);

        let archive = Arc::new(ArchiveSource::new(fetcher.clone(), content.clone(), settings.clone()));
        let engines: Vec<Arc<dyn SourceAdapter>> = vec![
            Arc::new(DuckDuckGoSource::new(fetcher.clone(), settings.clone())),
            Arc::new(GoogleSource::new(fetcher, settings)),
        ];

        let aggregator = Aggregator::new(archive.clone(), engines, content, AggregatorSettings::from(config));
        let cache = ResultCache::new(config.cache_settings());

        ServiceParts { service: Self::new(aggregator, cache), archive }
    }

    /// Build the production service with a reqwest-backed fetcher.
    pub fn from_config(config: &AppConfig) -> Result<ServiceParts, Error> {
        let fetcher = FetchClient::new(FetchConfig::from(config))?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Search for `query`, serving repeat requests within a cache bucket from memory.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for a blank query. Upstream failures never
    /// surface here; they shrink the result instead.
    pub async fn search(&self, query: &str, mode: SearchMode) -> Result<SearchResult, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("query parameter 'q' must not be blank".into()));
        }

        if let Some(mut cached) = self.cache.get(query, mode).await {
            tracing::debug!(mode = %mode, count = cached.count(), "search cache hit");
            cached.query = query.to_string();
            return Ok(cached);
        }

        let bucket = self.cache.bucket();
        let mut result = self.aggregator.run(query, mode).await;
        result.hits = dedup_hits(result.hits);

        self.cache.put(query, mode, bucket, result.clone()).await;
        Ok(result)
    }
}
