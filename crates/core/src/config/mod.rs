//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PASTEHUNT_*)
//! 2. TOML config file (if PASTEHUNT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::CacheSettings;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PASTEHUNT_*)
/// 2. TOML config file (if PASTEHUNT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    ///
    /// Set via PASTEHUNT_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// User-Agent string sent to every upstream source.
    ///
    /// Set via PASTEHUNT_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Base URL of the paste site (archive listing, view and raw links).
    ///
    /// Set via PASTEHUNT_ARCHIVE_BASE_URL environment variable.
    #[serde(default = "default_archive_base_url")]
    pub archive_base_url: String,

    /// Timeout for the archive listing fetch in milliseconds.
    #[serde(default = "default_listing_timeout_ms")]
    pub listing_timeout_ms: u64,

    /// Timeout for a single raw paste fetch in milliseconds.
    #[serde(default = "default_content_timeout_ms")]
    pub content_timeout_ms: u64,

    /// Timeout for a search engine results page in milliseconds.
    #[serde(default = "default_engine_timeout_ms")]
    pub engine_timeout_ms: u64,

    /// Bytes of raw paste content inspected per content check.
    #[serde(default = "default_content_peek_bytes")]
    pub content_peek_bytes: usize,

    /// Maximum size of a listing or results page.
    #[serde(default = "default_max_listing_bytes")]
    pub max_listing_bytes: usize,

    /// Unique hits after which fallback engines are skipped.
    #[serde(default = "default_sufficiency_threshold")]
    pub sufficiency_threshold: usize,

    /// Maximum raw fetches spent replacing placeholder snippets.
    #[serde(default = "default_max_enrich_fetches")]
    pub max_enrich_fetches: usize,

    /// Overall time budget for one aggregation run in milliseconds.
    #[serde(default = "default_request_budget_ms")]
    pub request_budget_ms: u64,

    /// Width of a result cache bucket in seconds.
    ///
    /// Set via PASTEHUNT_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached search results.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Default tracing filter when RUST_LOG is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".into()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Safari/537.36"
        .into()
}

fn default_archive_base_url() -> String {
    "https://pastebin.com".into()
}

fn default_listing_timeout_ms() -> u64 {
    10_000
}

fn default_content_timeout_ms() -> u64 {
    3_000
}

fn default_engine_timeout_ms() -> u64 {
    10_000
}

fn default_content_peek_bytes() -> usize {
    1_000
}

fn default_max_listing_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_sufficiency_threshold() -> usize {
    5
}

fn default_max_enrich_fetches() -> usize {
    5
}

fn default_request_budget_ms() -> u64 {
    25_000
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_capacity() -> usize {
    128
}

fn default_log_filter() -> String {
    "info".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            user_agent: default_user_agent(),
            archive_base_url: default_archive_base_url(),
            listing_timeout_ms: default_listing_timeout_ms(),
            content_timeout_ms: default_content_timeout_ms(),
            engine_timeout_ms: default_engine_timeout_ms(),
            content_peek_bytes: default_content_peek_bytes(),
            max_listing_bytes: default_max_listing_bytes(),
            sufficiency_threshold: default_sufficiency_threshold(),
            max_enrich_fetches: default_max_enrich_fetches(),
            request_budget_ms: default_request_budget_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    pub fn listing_timeout(&self) -> Duration {
        Duration::from_millis(self.listing_timeout_ms)
    }

    pub fn content_timeout(&self) -> Duration {
        Duration::from_millis(self.content_timeout_ms)
    }

    pub fn engine_timeout(&self) -> Duration {
        Duration::from_millis(self.engine_timeout_ms)
    }

    pub fn request_budget(&self) -> Duration {
        Duration::from_millis(self.request_budget_ms)
    }

    /// Result cache settings derived from this configuration.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings { ttl: Duration::from_secs(self.cache_ttl_secs), capacity: self.cache_capacity }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PASTEHUNT_`
    /// 2. TOML file from `PASTEHUNT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PASTEHUNT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PASTEHUNT_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
