//! Response DTOs for the blog API
//!
//! Defines the structure of outgoing HTTP response bodies that are not plain
//! blog or tag projections.

use serde::Serialize;

use crate::cache::{CacheStats, ReadCacheStats};

/// Counters for one read cache, with the derived hit rate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<&CacheStats> for CacheStatsResponse {
    fn from(stats: &CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub list: CacheStatsResponse,
    pub slug: CacheStatsResponse,
    /// Lifetime given to every cached read, in seconds
    pub ttl_seconds: u64,
}

impl StatsResponse {
    pub fn new(stats: &ReadCacheStats, ttl_seconds: u64) -> Self {
        Self {
            list: CacheStatsResponse::from(&stats.list),
            slug: CacheStatsResponse::from(&stats.slug),
            ttl_seconds,
        }
    }
}

/// Response body for GET /api/blogs/count
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub total_count: u64,
}

/// Response body for slug generation
#[derive(Debug, Clone, Serialize)]
pub struct SlugResponse {
    pub slug: String,
}

/// Response body for slug verification
#[derive(Debug, Clone, Serialize)]
pub struct SlugAvailabilityResponse {
    pub available: bool,
}

/// Acknowledgement for mutations that return no record.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
