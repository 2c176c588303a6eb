//! Client code for pastehunt.
//!
//! This crate provides the HTTP fetch pipeline, the source adapters
//! (archive listing, DuckDuckGo, Google), snippet extraction and the
//! aggregation orchestrator shared by the server and CLI.

pub mod aggregate;
pub mod content;
pub mod fetch;
pub mod service;
pub mod snippet;
pub mod sources;

#[cfg(test)]
mod testing;

pub use aggregate::{AggregationContext, Aggregator, AggregatorSettings, EnrichReport, dedup_hits};
pub use content::ContentFetcher;
pub use fetch::{FetchClient, FetchConfig, FetchRequest, FetchResponse, PageFetcher};
pub use service::{SearchService, ServiceParts};
pub use sources::{
    ArchiveSource, DuckDuckGoSource, GoogleSource, ListingEntry, ListingInspector, ListingSnapshot, SearchLimits,
    SourceAdapter, SourceError, SourceSettings,
};
