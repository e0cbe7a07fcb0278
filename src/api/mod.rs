//! API Module
//!
//! HTTP handlers and routing for the blog REST API.
//!
//! # Endpoints
//! - `GET /api/blogs`, `GET /api/blogs/:slug` - Cached published reads
//! - `GET /api/blogs/tag/:tag_slug` - Cached tag listing
//! - `/api/private/*` - Uncached dashboard reads and all writes
//! - `GET /stats` - Read cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
