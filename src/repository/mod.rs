//! Repository traits describing the authoritative document store.
//!
//! Everything the cache sits in front of goes through these traits, so the
//! serving layer never knows whether it talks to a database or to the
//! in-process [`MemoryStore`].

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AdminBlog, AdminListQuery, Blog, BlogDetail, BlogPatch, BlogSummary, ListQuery, NewBlog, Tag,
};

mod memory;

pub use memory::MemoryStore;

// == Repo Error ==
/// Failure reported by the authoritative store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Published, non-deleted blogs matching `query`, in page order.
    async fn find_published(&self, query: &ListQuery) -> Result<Vec<BlogSummary>, RepoError>;

    /// The published blog with `slug`, or `None`.
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<BlogDetail>, RepoError>;

    async fn find_admin(&self, query: &AdminListQuery) -> Result<Vec<AdminBlog>, RepoError>;

    async fn find_admin_by_slug(&self, slug: &str) -> Result<Option<AdminBlog>, RepoError>;

    async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<AdminBlog>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, RepoError>;

    async fn count(&self, published_only: bool) -> Result<u64, RepoError>;

    /// Whether any non-deleted blog uses `slug`.
    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;

    async fn create(&self, blog: NewBlog) -> Result<Blog, RepoError>;

    /// Applies `patch` and returns the updated record, or `None` for an
    /// unknown or deleted id.
    async fn update(&self, id: Uuid, patch: BlogPatch) -> Result<Option<Blog>, RepoError>;

    /// Marks the blog deleted and returns it as it was, or `None`.
    async fn soft_delete(&self, id: Uuid) -> Result<Option<Blog>, RepoError>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn find_all(&self, limit: u32, offset: u32) -> Result<Vec<Tag>, RepoError>;

    /// Tags whose name starts with `prefix`, case-insensitively.
    async fn search_prefix(
        &self,
        prefix: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Tag>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    async fn create(&self, name: &str) -> Result<Tag, RepoError>;
}
