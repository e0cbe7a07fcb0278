//! Cache Module
//!
//! In-memory caching with TTL expiration and LRU eviction, and the blog
//! read-through cache built on top of it.

mod blog_cache;
mod clock;
mod entry;
mod keys;
mod lock;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use blog_cache::{BlogReadCache, PublishedBlogSource, ReadCacheStats};
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use keys::{build_list_key, build_slug_key};
pub use stats::CacheStats;
pub use store::BoundedExpiringCache;
