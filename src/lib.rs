//! Blog Cache - a blog content service with a bounded read-through cache
//!
//! Published blog listings and single posts are served from a size-bounded,
//! time-expiring LRU cache that every write explicitly invalidates.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use api::{create_router, AppState};
pub use cache::{BlogReadCache, BoundedExpiringCache};
pub use config::Config;
pub use error::AppError;
