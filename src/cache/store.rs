//! Cache Store Module
//!
//! Bounded key-value storage combining LRU recency with per-entry TTL.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::Duration;

use lru::LruCache;
use tracing::trace;

use crate::cache::lock::mutex_lock;
use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};
use crate::config::ConfigError;

struct Inner<V> {
    entries: LruCache<String, CacheEntry<V>>,
    stats: CacheStats,
}

// == Bounded Expiring Cache ==
/// String-keyed cache with a hard entry limit and per-entry expiry.
///
/// Recency is kept by the underlying linked hash map: every hit and every
/// `set` moves the key to the most-recently-used end, and an overflowing
/// `set` drops exactly one entry from the least-recently-used end.
///
/// Expired entries are never swept in the background. They are removed by
/// the next `get` that touches them, by capacity pressure, or by `clear`.
///
/// All operations take a single lock for their whole duration and never
/// suspend, so the cache can be shared freely across tasks and threads.
pub struct BoundedExpiringCache<V, C = SystemClock> {
    inner: Mutex<Inner<V>>,
    clock: C,
}

impl<V> BoundedExpiringCache<V, SystemClock> {
    /// Creates a cache holding at most `max_size` entries, using the wall clock.
    pub fn new(max_size: usize) -> Result<Self, ConfigError> {
        Self::with_clock(max_size, SystemClock)
    }
}

impl<V, C: Clock> BoundedExpiringCache<V, C> {
    /// Creates a cache with a custom clock.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidCapacity`] when `max_size` is zero.
    pub fn with_clock(max_size: usize, clock: C) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(max_size).ok_or(ConfigError::InvalidCapacity)?;

        Ok(Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(capacity),
                stats: CacheStats::new(),
            }),
            clock,
        })
    }

    // == Get ==
    /// Returns the value stored under `key` if present and unexpired.
    ///
    /// A hit promotes the key to most-recently-used. An expired entry is
    /// removed on the spot and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let now = self.clock.now_ms();
        let mut guard = mutex_lock(&self.inner, "get");
        let Inner { entries, stats } = &mut *guard;

        let expired = match entries.peek(key) {
            None => {
                stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired_at(now),
        };

        if expired {
            entries.pop(key);
            stats.record_expiration();
            stats.set_total_entries(entries.len());
            trace!(key, "expired cache entry removed on access");
            return None;
        }

        stats.record_hit();
        entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`.
    ///
    /// An existing entry for `key` is replaced and the key becomes
    /// most-recently-used. When the insert pushes the cache over capacity the
    /// least-recently-used entry is evicted.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl);

        let mut guard = mutex_lock(&self.inner, "set");
        let Inner { entries, stats } = &mut *guard;

        entries.pop(&key);
        if let Some((evicted, _)) = entries.push(key, entry) {
            stats.record_eviction();
            trace!(key = %evicted, "least recently used cache entry evicted");
        }
        stats.set_total_entries(entries.len());
    }

    // == Delete ==
    /// Removes `key` if present. Absent keys are ignored.
    pub fn delete(&self, key: &str) {
        let mut guard = mutex_lock(&self.inner, "delete");
        let Inner { entries, stats } = &mut *guard;

        entries.pop(key);
        stats.set_total_entries(entries.len());
    }

    // == Clear ==
    /// Drops every entry. Counters other than the entry count are kept.
    pub fn clear(&self) {
        let mut guard = mutex_lock(&self.inner, "clear");
        guard.entries.clear();
        guard.stats.set_total_entries(0);
    }

    /// Whether `key` holds an unexpired entry. Does not touch recency.
    pub fn contains(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        mutex_lock(&self.inner, "contains")
            .entries
            .peek(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Number of stored entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        mutex_lock(&self.inner, "len").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        mutex_lock(&self.inner, "capacity").entries.cap().get()
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        let guard = mutex_lock(&self.inner, "stats");
        let mut stats = guard.stats.clone();
        stats.set_total_entries(guard.entries.len());
        stats
    }
}
