//! Blog use cases.
//!
//! Public reads go through [`BlogReadCache`]; admin reads and all writes go
//! straight to the repository. Every successful write clears the cached
//! reads it could have made stale before returning.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::cache::BlogReadCache;
use crate::error::{AppError, Result};
use crate::models::{
    AdminBlog, AdminListQuery, Blog, BlogDetail, BlogPatch, BlogSummary, CreateBlogRequest,
    ListQuery, NewBlog,
};
use crate::repository::{BlogRepository, TagRepository};

pub const DEFAULT_BLOG_TITLE: &str = "Untitled Blog";

const SLUG_CONFLICT: &str = "Slug is already in use";
const MAX_SUFFIX_ATTEMPTS: u32 = 32;

pub struct BlogService {
    blogs: Arc<dyn BlogRepository>,
    tags: Arc<dyn TagRepository>,
    cache: Arc<BlogReadCache>,
}

impl BlogService {
    pub fn new(
        blogs: Arc<dyn BlogRepository>,
        tags: Arc<dyn TagRepository>,
        cache: Arc<BlogReadCache>,
    ) -> Self {
        Self { blogs, tags, cache }
    }

    // == Public reads ==

    pub async fn list_public_blogs(&self, query: &ListQuery) -> Result<Vec<BlogSummary>> {
        Ok(self.cache.get_public_list(self.blogs.as_ref(), query).await?)
    }

    /// Published blogs carrying `tag_slug`. An unknown tag yields an empty
    /// page and leaves the cache alone.
    pub async fn filter_public_blogs_by_tag(
        &self,
        tag_slug: &str,
        query: ListQuery,
    ) -> Result<Vec<BlogSummary>> {
        if self.tags.find_by_slug(tag_slug).await?.is_none() {
            return Ok(Vec::new());
        }
        let query = query.with_tag(tag_slug);
        Ok(self.cache.get_public_list(self.blogs.as_ref(), &query).await?)
    }

    pub async fn get_public_blog_by_slug(&self, slug: &str) -> Result<BlogDetail> {
        self.cache
            .get_public_by_slug(self.blogs.as_ref(), slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))
    }

    pub async fn count_blogs(&self, published_only: bool) -> Result<u64> {
        Ok(self.blogs.count(published_only).await?)
    }

    // == Admin reads ==

    pub async fn list_admin_blogs(&self, query: &AdminListQuery) -> Result<Vec<AdminBlog>> {
        Ok(self.blogs.find_admin(query).await?)
    }

    pub async fn filter_admin_blogs_by_tag(
        &self,
        tag_slug: &str,
        mut query: AdminListQuery,
    ) -> Result<Vec<AdminBlog>> {
        if self.tags.find_by_slug(tag_slug).await?.is_none() {
            return Ok(Vec::new());
        }
        query.tag_slugs.push(tag_slug.to_string());
        Ok(self.blogs.find_admin(&query).await?)
    }

    pub async fn get_admin_blog(&self, id: Uuid) -> Result<AdminBlog> {
        self.blogs
            .find_admin_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn get_admin_blog_by_slug(&self, slug: &str) -> Result<AdminBlog> {
        self.blogs
            .find_admin_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))
    }

    // == Writes ==

    pub async fn create_blog(&self, request: CreateBlogRequest) -> Result<Blog> {
        let title = request
            .title
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| DEFAULT_BLOG_TITLE.to_string());
        let slug = match request.slug {
            Some(slug) => slug,
            None => self.generate_slug(&title).await?,
        };

        let new_blog = NewBlog {
            title,
            slug,
            author_id: request.author_id,
            content: request.content.unwrap_or_default(),
            short_description: request.short_description.unwrap_or_default(),
            date_published: request.published.then(Utc::now),
            tag_ids: request.tag_ids,
        };
        let blog = self
            .blogs
            .create(new_blog)
            .await
            .map_err(|e| AppError::from_repo(e, SLUG_CONFLICT))?;

        info!(id = %blog.id, slug = %blog.slug, "blog created");
        self.cache.invalidate_list();
        Ok(blog)
    }

    /// Applies `patch`. Clears the list cache and the cached post under both
    /// the previous and the new slug.
    pub async fn update_blog(&self, id: Uuid, patch: BlogPatch) -> Result<Blog> {
        let previous = self
            .blogs
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        let blog = self
            .blogs
            .update(id, patch)
            .await
            .map_err(|e| AppError::from_repo(e, SLUG_CONFLICT))?
            .ok_or_else(|| not_found(id))?;

        info!(%id, slug = %blog.slug, "blog updated");
        self.cache.invalidate_list();
        self.cache.invalidate_slug(&previous.slug);
        if blog.slug != previous.slug {
            self.cache.invalidate_slug(&blog.slug);
        }
        Ok(blog)
    }

    /// Soft-deletes the blog and returns it as it was.
    pub async fn delete_blog(&self, id: Uuid) -> Result<Blog> {
        let blog = self
            .blogs
            .soft_delete(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(%id, slug = %blog.slug, "blog deleted");
        self.cache.invalidate_list();
        self.cache.invalidate_slug(&blog.slug);
        Ok(blog)
    }

    // == Slugs ==

    /// URL-safe slug for `title` that no live blog uses yet. Taken slugs get
    /// a numeric suffix starting at 2.
    pub async fn generate_slug(&self, title: &str) -> Result<String> {
        let mut base = slug::slugify(title);
        if base.is_empty() {
            base = slug::slugify(DEFAULT_BLOG_TITLE);
        }

        if !self.blogs.slug_exists(&base).await? {
            return Ok(base);
        }
        for attempt in 2..=MAX_SUFFIX_ATTEMPTS + 1 {
            let candidate = format!("{base}-{attempt}");
            if !self.blogs.slug_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(AppError::Conflict(format!("No free slug left for '{base}'")))
    }

    /// Whether `slug` is still free.
    pub async fn verify_slug(&self, slug: &str) -> Result<bool> {
        Ok(!self.blogs.slug_exists(slug).await?)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Blog {id} not found"))
}
