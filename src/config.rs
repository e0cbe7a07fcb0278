//! Configuration Module
//!
//! Handles loading and validating server configuration from environment
//! variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_MAX_CACHE_SIZE: usize = 100;
const DEFAULT_CACHE_EXPIRY_HOURS: u64 = 6;
const DEFAULT_SERVER_PORT: u16 = 3000;

// == Config Error ==
/// Invalid startup configuration. Always fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed as a positive integer
    #[error("environment variable {name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    /// A cache was asked to hold zero entries
    #[error("cache capacity must be at least 1")]
    InvalidCapacity,
}

/// Server configuration parameters.
///
/// Unset variables fall back to their defaults. A variable that is set but
/// empty, unparseable, or zero stops the server from starting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries each read cache can hold
    pub max_cache_size: usize,
    /// Lifetime of a cached read, in hours
    pub cache_expiry_hours: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Loads the configuration from the process environment.
    ///
    /// # Environment Variables
    /// - `MAX_CACHE_SIZE` - Entries per read cache (default: 100)
    /// - `CACHE_EXPIRY_HOURS` - Cached read lifetime in hours (default: 6)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            max_cache_size: positive(&lookup, "MAX_CACHE_SIZE", DEFAULT_MAX_CACHE_SIZE)?,
            cache_expiry_hours: positive(
                &lookup,
                "CACHE_EXPIRY_HOURS",
                DEFAULT_CACHE_EXPIRY_HOURS,
            )?,
            server_port: positive(&lookup, "SERVER_PORT", DEFAULT_SERVER_PORT)?,
        })
    }

    /// Lifetime applied to every cached read.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_expiry_hours.saturating_mul(60 * 60))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
            cache_expiry_hours: DEFAULT_CACHE_EXPIRY_HOURS,
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

fn positive<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialEq + Default,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => Ok(value),
        _ => Err(ConfigError::InvalidNumber { name, value: raw }),
    }
}
