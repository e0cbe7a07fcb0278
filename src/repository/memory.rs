//! In-process document store.
//!
//! Mirrors the behaviour of the document-store aggregations the service was
//! designed around: soft-deleted records are invisible, "published" means a
//! publication date is set, tag filters require every listed tag, embedded
//! tags exclude deleted ones, and a missing author projects as `null`.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BlogRepository, RepoError, TagRepository};
use crate::models::{
    AdminBlog, AdminListQuery, Author, Blog, BlogDetail, BlogPatch, BlogSummary, ListQuery,
    NewBlog, PublicTag, SortOrder, Tag,
};

#[derive(Debug, Default)]
struct Collections {
    /// Insertion order doubles as the tie-break for equal sort keys.
    blogs: Vec<Blog>,
    tags: Vec<Tag>,
    authors: HashMap<Uuid, Author>,
}

impl Collections {
    fn blog(&self, id: Uuid) -> Option<&Blog> {
        self.blogs.iter().find(|b| b.id == id && !b.is_deleted())
    }

    fn blog_mut(&mut self, id: Uuid) -> Option<&mut Blog> {
        self.blogs
            .iter_mut()
            .find(|b| b.id == id && !b.is_deleted())
    }

    fn blog_by_slug(&self, slug: &str) -> Option<&Blog> {
        self.blogs.iter().find(|b| b.slug == slug && !b.is_deleted())
    }

    fn active_tag_by_slug(&self, slug: &str) -> Option<&Tag> {
        self.tags
            .iter()
            .find(|t| t.slug == slug && t.deleted_at.is_none())
    }

    /// Active tags referenced by `ids`, in reference order.
    fn active_tags(&self, ids: &[Uuid]) -> Vec<&Tag> {
        ids.iter()
            .filter_map(|id| {
                self.tags
                    .iter()
                    .find(|t| t.id == *id && t.deleted_at.is_none())
            })
            .collect()
    }

    fn author(&self, id: Option<Uuid>) -> Option<Author> {
        id.and_then(|id| self.authors.get(&id).cloned())
    }

    /// Resolves tag slugs to ids. `None` if any slug names no active tag,
    /// which makes the whole filter unsatisfiable.
    fn resolve_tag_filter(&self, slugs: &[String]) -> Option<Vec<Uuid>> {
        slugs
            .iter()
            .map(|slug| self.active_tag_by_slug(slug).map(|t| t.id))
            .collect()
    }

    /// Non-deleted blogs matching the filter, sorted newest first, paged.
    fn select(
        &self,
        tag_slugs: &[String],
        published_only: bool,
        sort: SortOrder,
        limit: u32,
        offset: u32,
    ) -> Vec<&Blog> {
        let Some(required) = self.resolve_tag_filter(tag_slugs) else {
            return Vec::new();
        };

        let mut matches: Vec<&Blog> = self
            .blogs
            .iter()
            .rev()
            .filter(|b| !b.is_deleted())
            .filter(|b| !published_only || b.is_published())
            .filter(|b| required.iter().all(|id| b.tag_ids.contains(id)))
            .collect();

        match sort {
            SortOrder::Published => matches.sort_by_key(|b| Reverse(b.date_published)),
            SortOrder::Created => matches.sort_by_key(|b| Reverse(b.created_at)),
        }

        matches
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect()
    }

    fn summary(&self, blog: &Blog, include_content: bool) -> BlogSummary {
        BlogSummary {
            id: blog.id,
            title: blog.title.clone(),
            slug: blog.slug.clone(),
            content: include_content.then(|| blog.content.clone()),
            short_description: blog.short_description.clone(),
            date_published: blog.date_published,
            updated_at: blog.updated_at,
            tags: self
                .active_tags(&blog.tag_ids)
                .into_iter()
                .map(PublicTag::from)
                .collect(),
            author: self.author(blog.author_id),
        }
    }

    fn detail(&self, blog: &Blog) -> BlogDetail {
        BlogDetail {
            id: blog.id,
            title: blog.title.clone(),
            slug: blog.slug.clone(),
            content: blog.content.clone(),
            short_description: blog.short_description.clone(),
            date_published: blog.date_published,
            updated_at: blog.updated_at,
            tags: self
                .active_tags(&blog.tag_ids)
                .into_iter()
                .map(PublicTag::from)
                .collect(),
            author: self.author(blog.author_id),
        }
    }

    fn admin(&self, blog: &Blog, include_content: bool) -> AdminBlog {
        AdminBlog {
            id: blog.id,
            title: blog.title.clone(),
            slug: blog.slug.clone(),
            content: include_content.then(|| blog.content.clone()),
            short_description: blog.short_description.clone(),
            date_published: blog.date_published,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
            deleted_at: blog.deleted_at,
            tags: self
                .active_tags(&blog.tag_ids)
                .into_iter()
                .cloned()
                .collect(),
            author: self.author(blog.author_id),
        }
    }
}

fn duplicate_slug(collection: &str) -> RepoError {
    RepoError::Duplicate {
        constraint: format!("{collection}.slug"),
    }
}

// == Memory Store ==
/// Blog and tag collections held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Collections>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with a persistence error until
    /// switched back. Used to exercise store outages.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Registers an author that blogs can reference.
    pub async fn insert_author(&self, name: &str, username: &str) -> Author {
        let author = Author {
            id: Uuid::new_v4(),
            name: name.to_string(),
            username: username.to_string(),
        };
        self.data
            .write()
            .await
            .authors
            .insert(author.id, author.clone());
        author
    }

    /// Soft-deletes a tag so it disappears from every projection.
    pub async fn soft_delete_tag(&self, id: Uuid) -> Option<Tag> {
        let mut data = self.data.write().await;
        let tag = data
            .tags
            .iter_mut()
            .find(|t| t.id == id && t.deleted_at.is_none())?;
        let now = Utc::now();
        tag.deleted_at = Some(now);
        tag.updated_at = now;
        Some(tag.clone())
    }

    fn check_available(&self) -> Result<(), RepoError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RepoError::from_persistence("document store unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BlogRepository for MemoryStore {
    async fn find_published(&self, query: &ListQuery) -> Result<Vec<BlogSummary>, RepoError> {
        self.check_available()?;
        let data = self.data.read().await;

        Ok(data
            .select(&query.tag_slugs, true, query.sort, query.limit, query.offset)
            .into_iter()
            .map(|blog| data.summary(blog, query.include_content))
            .collect())
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<BlogDetail>, RepoError> {
        self.check_available()?;
        let data = self.data.read().await;

        Ok(data
            .blog_by_slug(slug)
            .filter(|blog| blog.is_published())
            .map(|blog| data.detail(blog)))
    }

    async fn find_admin(&self, query: &AdminListQuery) -> Result<Vec<AdminBlog>, RepoError> {
        self.check_available()?;
        let data = self.data.read().await;

        Ok(data
            .select(
                &query.tag_slugs,
                query.published_only,
                SortOrder::Created,
                query.limit,
                query.offset,
            )
            .into_iter()
            .map(|blog| data.admin(blog, query.include_content))
            .collect())
    }

    async fn find_admin_by_slug(&self, slug: &str) -> Result<Option<AdminBlog>, RepoError> {
        self.check_available()?;
        let data = self.data.read().await;
        Ok(data.blog_by_slug(slug).map(|blog| data.admin(blog, true)))
    }

    async fn find_admin_by_id(&self, id: Uuid) -> Result<Option<AdminBlog>, RepoError> {
        self.check_available()?;
        let data = self.data.read().await;
        Ok(data.blog(id).map(|blog| data.admin(blog, true)))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        self.check_available()?;
        Ok(self.data.read().await.blog(id).cloned())
    }

    async fn count(&self, published_only: bool) -> Result<u64, RepoError> {
        self.check_available()?;
        let data = self.data.read().await;

        Ok(data
            .blogs
            .iter()
            .filter(|b| !b.is_deleted())
            .filter(|b| !published_only || b.is_published())
            .count() as u64)
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        self.check_available()?;
        Ok(self.data.read().await.blog_by_slug(slug).is_some())
    }

    async fn create(&self, blog: NewBlog) -> Result<Blog, RepoError> {
        self.check_available()?;
        let mut data = self.data.write().await;

        if data.blog_by_slug(&blog.slug).is_some() {
            return Err(duplicate_slug("blogs"));
        }

        let now = Utc::now();
        let record = Blog {
            id: Uuid::new_v4(),
            title: blog.title,
            slug: blog.slug,
            author_id: blog.author_id,
            content: blog.content,
            short_description: blog.short_description,
            date_published: blog.date_published,
            tag_ids: blog.tag_ids,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        data.blogs.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: BlogPatch) -> Result<Option<Blog>, RepoError> {
        self.check_available()?;
        let mut data = self.data.write().await;

        if let Some(slug) = &patch.slug {
            if data.blog_by_slug(slug).is_some_and(|other| other.id != id) {
                return Err(duplicate_slug("blogs"));
            }
        }

        let Some(blog) = data.blog_mut(id) else {
            return Ok(None);
        };
        if patch.is_empty() {
            return Ok(Some(blog.clone()));
        }

        let now = Utc::now();
        if let Some(title) = patch.title {
            blog.title = title;
        }
        if let Some(slug) = patch.slug {
            blog.slug = slug;
        }
        if let Some(content) = patch.content {
            blog.content = content;
        }
        if let Some(short_description) = patch.short_description {
            blog.short_description = short_description;
        }
        match patch.published {
            Some(true) if blog.date_published.is_none() => blog.date_published = Some(now),
            Some(false) => blog.date_published = None,
            _ => {}
        }
        if let Some(tag_ids) = patch.tag_ids {
            blog.tag_ids = tag_ids;
        }
        blog.updated_at = now;

        Ok(Some(blog.clone()))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<Option<Blog>, RepoError> {
        self.check_available()?;
        let mut data = self.data.write().await;

        let Some(blog) = data.blog_mut(id) else {
            return Ok(None);
        };
        let before = blog.clone();
        blog.deleted_at = Some(Utc::now());
        Ok(Some(before))
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn find_all(&self, limit: u32, offset: u32) -> Result<Vec<Tag>, RepoError> {
        self.check_available()?;
        let data = self.data.read().await;

        Ok(data
            .tags
            .iter()
            .filter(|t| t.deleted_at.is_none())
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn search_prefix(
        &self,
        prefix: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Tag>, RepoError> {
        self.check_available()?;
        let prefix = prefix.to_lowercase();
        let data = self.data.read().await;

        Ok(data
            .tags
            .iter()
            .filter(|t| t.deleted_at.is_none())
            .filter(|t| t.name.to_lowercase().starts_with(&prefix))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        self.check_available()?;
        Ok(self.data.read().await.active_tag_by_slug(slug).cloned())
    }

    async fn create(&self, name: &str) -> Result<Tag, RepoError> {
        self.check_available()?;
        let slug = slug::slugify(name);
        let mut data = self.data.write().await;

        if data.active_tag_by_slug(&slug).is_some() {
            return Err(duplicate_slug("tags"));
        }

        let now = Utc::now();
        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            slug,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        data.tags.push(tag.clone());
        Ok(tag)
    }
}
