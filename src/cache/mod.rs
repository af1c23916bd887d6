//! On-disk cache for forecast source responses
//!
//! Entries carry a TTL. Expired entries are still handed back, flagged, so a
//! source can degrade to stale data when its API is unavailable.

mod manager;

pub use manager::{CacheManager, CachedData};
