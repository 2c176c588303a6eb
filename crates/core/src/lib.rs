//! Core types and shared functionality for pastehunt.
//!
//! This crate provides:
//! - Domain types for paste candidates, hits and search results
//! - Time-bucketed in-memory result cache
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod types;

pub use cache::{CacheSettings, Clock, ManualClock, ResultCache, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use types::{Candidate, Hit, MatchKind, PasteId, SearchMode, SearchResult, SnippetHint, SourceKind};
