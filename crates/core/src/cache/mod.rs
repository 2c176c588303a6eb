//! In-memory, time-bucketed cache for aggregated search results.
//!
//! Repeated requests for the same query and mode inside one TTL window
//! collapse onto a single computed result. It supports:
//!
//! - Digest keys over the normalized query and search mode
//! - Bucketed expiry (`bucket = floor(now / ttl)`) with an injectable clock
//! - Bounded capacity with least-recently-inserted eviction

pub mod clock;
pub mod hash;
pub mod results;

pub use clock::{Clock, ManualClock, SystemClock};
pub use results::{CacheEntry, CacheSettings, ResultCache};
