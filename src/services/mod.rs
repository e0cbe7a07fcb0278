//! Application services sitting between the HTTP handlers and the store.

mod blog_service;
mod tag_service;

pub use blog_service::{BlogService, DEFAULT_BLOG_TITLE};
pub use tag_service::TagService;
