//! Read-through cache for published blog reads.
//!
//! Two bounded expiring caches sit in front of the authoritative store: one
//! for listing pages and one for single posts looked up by slug. Reads fill
//! them on a miss; every blog or tag mutation clears them explicitly before
//! its response goes out.
//!
//! A read that started before a write's invalidation can still land its
//! (now stale) result afterwards. That window is accepted and capped by the
//! entry TTL.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::{build_list_key, build_slug_key, BoundedExpiringCache, CacheStats, Clock};
use crate::config::{Config, ConfigError};
use crate::models::{BlogDetail, BlogSummary, ListQuery};
use crate::repository::{BlogRepository, RepoError};

// == Published Blog Source ==
/// The two authoritative queries the cache reads through to.
#[async_trait]
pub trait PublishedBlogSource: Send + Sync {
    async fn query_published_list(&self, query: &ListQuery)
        -> Result<Vec<BlogSummary>, RepoError>;

    async fn query_single_by_slug(&self, slug: &str) -> Result<Option<BlogDetail>, RepoError>;
}

#[async_trait]
impl<T: BlogRepository + ?Sized> PublishedBlogSource for T {
    async fn query_published_list(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<BlogSummary>, RepoError> {
        self.find_published(query).await
    }

    async fn query_single_by_slug(&self, slug: &str) -> Result<Option<BlogDetail>, RepoError> {
        self.find_published_by_slug(slug).await
    }
}

/// Counters for both read caches.
#[derive(Debug, Clone, Serialize)]
pub struct ReadCacheStats {
    pub list: CacheStats,
    pub slug: CacheStats,
}

// == Blog Read Cache ==
pub struct BlogReadCache {
    list_cache: BoundedExpiringCache<Vec<BlogSummary>, Arc<dyn Clock>>,
    slug_cache: BoundedExpiringCache<BlogDetail, Arc<dyn Clock>>,
    ttl: Duration,
}

impl BlogReadCache {
    /// Builds both caches with the same capacity and TTL on the wall clock.
    pub fn new(max_entries: usize, ttl: Duration) -> Result<Self, ConfigError> {
        Self::with_clock(max_entries, ttl, Arc::new(crate::cache::SystemClock))
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(config.max_cache_size, config.cache_ttl())
    }

    pub fn with_clock(
        max_entries: usize,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            list_cache: BoundedExpiringCache::with_clock(max_entries, Arc::clone(&clock))?,
            slug_cache: BoundedExpiringCache::with_clock(max_entries, clock)?,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Read-through ==

    /// One page of published blogs, served from cache when possible.
    ///
    /// Store failures propagate and leave the cache untouched. If the
    /// returned future is dropped while the store call is in flight, nothing
    /// is cached.
    pub async fn get_public_list<S>(
        &self,
        source: &S,
        query: &ListQuery,
    ) -> Result<Vec<BlogSummary>, RepoError>
    where
        S: PublishedBlogSource + ?Sized,
    {
        let key = build_list_key(query);
        if let Some(page) = self.list_cache.get(&key) {
            debug!(%key, "blog list cache hit");
            return Ok(page);
        }

        debug!(%key, "blog list cache miss");
        let page = source.query_published_list(query).await?;
        self.list_cache.set(key, page.clone(), self.ttl);
        Ok(page)
    }

    /// A single published blog by slug, served from cache when possible.
    ///
    /// `None` is returned as-is and never cached, so a post published later
    /// under the same slug shows up on the next read.
    pub async fn get_public_by_slug<S>(
        &self,
        source: &S,
        slug: &str,
    ) -> Result<Option<BlogDetail>, RepoError>
    where
        S: PublishedBlogSource + ?Sized,
    {
        let key = build_slug_key(slug);
        if let Some(blog) = self.slug_cache.get(&key) {
            debug!(%key, "blog slug cache hit");
            return Ok(Some(blog));
        }

        debug!(%key, "blog slug cache miss");
        let blog = source.query_single_by_slug(slug).await?;
        if let Some(blog) = &blog {
            self.slug_cache.set(key, blog.clone(), self.ttl);
        }
        Ok(blog)
    }

    // == Invalidation ==

    /// Drops every cached listing page.
    pub fn invalidate_list(&self) {
        self.list_cache.clear();
        info!("blog list cache cleared");
    }

    /// Drops the cached post for `slug`, if any.
    pub fn invalidate_slug(&self, slug: &str) {
        self.slug_cache.delete(&build_slug_key(slug));
        info!(slug, "blog slug cache entry dropped");
    }

    pub fn invalidate_all(&self) {
        self.list_cache.clear();
        self.slug_cache.clear();
        info!("all blog read caches cleared");
    }

    pub fn stats(&self) -> ReadCacheStats {
        ReadCacheStats {
            list: self.list_cache.stats(),
            slug: self.slug_cache.stats(),
        }
    }
}
