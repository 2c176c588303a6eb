//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::net::SocketAddr;

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn check_timeout(field: &str, value_ms: u64) -> Result<(), ConfigError> {
    if value_ms < 100 {
        return Err(invalid(field, "must be at least 100ms"));
    }
    if value_ms > 300_000 {
        return Err(invalid(field, "must not exceed 5 minutes (300000ms)"));
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `bind_addr` is not a socket address
    /// - `user_agent` is empty
    /// - `archive_base_url` is not an http(s) URL
    /// - any timeout is below 100ms or above 5 minutes
    /// - `content_peek_bytes` is outside 1000..=5000
    /// - `max_listing_bytes` is 0 or exceeds 50MB
    /// - `sufficiency_threshold`, `cache_ttl_secs` or `cache_capacity` is 0
    /// - `request_budget_ms` is shorter than `listing_timeout_ms + content_timeout_ms`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(invalid("bind_addr", "must be a socket address such as 0.0.0.0:5000"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        match url::Url::parse(&self.archive_base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(invalid("archive_base_url", "must be an http(s) URL")),
        }

        check_timeout("listing_timeout_ms", self.listing_timeout_ms)?;
        check_timeout("content_timeout_ms", self.content_timeout_ms)?;
        check_timeout("engine_timeout_ms", self.engine_timeout_ms)?;
        check_timeout("request_budget_ms", self.request_budget_ms)?;

        if !(1_000..=5_000).contains(&self.content_peek_bytes) {
            return Err(invalid("content_peek_bytes", "must be between 1000 and 5000"));
        }

        if self.max_listing_bytes == 0 {
            return Err(invalid("max_listing_bytes", "must be greater than 0"));
        }
        if self.max_listing_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_listing_bytes", "must not exceed 50MB"));
        }

        if self.sufficiency_threshold == 0 {
            return Err(invalid("sufficiency_threshold", "must be greater than 0"));
        }

        if self.cache_ttl_secs == 0 {
            return Err(invalid("cache_ttl_secs", "must be greater than 0"));
        }
        if self.cache_capacity == 0 {
            return Err(invalid("cache_capacity", "must be greater than 0"));
        }

        if self.request_budget_ms < self.listing_timeout_ms + self.content_timeout_ms {
            return Err(invalid(
                "request_budget_ms",
                "must cover listing_timeout_ms plus content_timeout_ms so the archive stage can finish",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_field(config: &AppConfig) -> Option<String> {
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bind_addr() {
        let config = AppConfig { bind_addr: "localhost".into(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("bind_addr"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("user_agent"));
    }

    #[test]
    fn test_validate_archive_base_url() {
        let config = AppConfig { archive_base_url: "file:///tmp".into(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("archive_base_url"));

        let config = AppConfig { archive_base_url: "not a url".into(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("archive_base_url"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let config = AppConfig { content_timeout_ms: 50, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("content_timeout_ms"));

        let config = AppConfig { listing_timeout_ms: 301_000, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("listing_timeout_ms"));
    }

    #[test]
    fn test_validate_content_peek_bounds() {
        let config = AppConfig { content_peek_bytes: 999, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("content_peek_bytes"));

        let config = AppConfig { content_peek_bytes: 5_001, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("content_peek_bytes"));

        let config = AppConfig { content_peek_bytes: 5_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_listing_bytes() {
        let config = AppConfig { max_listing_bytes: 0, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("max_listing_bytes"));

        let config = AppConfig { max_listing_bytes: 51 * 1024 * 1024, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("max_listing_bytes"));
    }

    #[test]
    fn test_validate_zero_limits() {
        let config = AppConfig { sufficiency_threshold: 0, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("sufficiency_threshold"));

        let config = AppConfig { cache_ttl_secs: 0, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("cache_ttl_secs"));

        let config = AppConfig { cache_capacity: 0, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("cache_capacity"));
    }

    #[test]
    fn test_validate_zero_enrichment_allowed() {
        let config = AppConfig { max_enrich_fetches: 0, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_budget_covers_archive_stage() {
        let config = AppConfig { request_budget_ms: 12_999, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("request_budget_ms"));

        let config = AppConfig { request_budget_ms: 13_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
