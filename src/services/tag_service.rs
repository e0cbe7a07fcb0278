//! Tag use cases.

use std::sync::Arc;

use tracing::info;

use crate::cache::BlogReadCache;
use crate::error::{AppError, Result};
use crate::models::{PublicTag, Tag};
use crate::repository::TagRepository;

pub struct TagService {
    tags: Arc<dyn TagRepository>,
    cache: Arc<BlogReadCache>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepository>, cache: Arc<BlogReadCache>) -> Self {
        Self { tags, cache }
    }

    pub async fn list_tags(&self, limit: u32, offset: u32) -> Result<Vec<PublicTag>> {
        let tags = self.tags.find_all(limit, offset).await?;
        Ok(tags.iter().map(PublicTag::from).collect())
    }

    /// Tags whose name starts with `prefix`, ignoring case.
    pub async fn search_tags(&self, prefix: &str, limit: u32, offset: u32) -> Result<Vec<Tag>> {
        Ok(self.tags.search_prefix(prefix.trim(), limit, offset).await?)
    }

    /// Creates a tag. Cached listings embed tag data, so they are cleared.
    pub async fn create_tag(&self, name: &str) -> Result<Tag> {
        let name = name.trim();
        if slug::slugify(name).is_empty() {
            return Err(AppError::InvalidRequest(
                "Tag name must contain letters or digits".to_string(),
            ));
        }

        let tag = self
            .tags
            .create(name)
            .await
            .map_err(|e| AppError::from_repo(e, format!("Tag '{name}' already exists")))?;

        info!(id = %tag.id, slug = %tag.slug, "tag created");
        self.cache.invalidate_list();
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListQuery;
    use crate::repository::MemoryStore;
    use std::time::Duration;

    fn service() -> (TagService, Arc<MemoryStore>, Arc<BlogReadCache>) {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(BlogReadCache::new(10, Duration::from_secs(60)).unwrap());
        (TagService::new(store.clone(), cache.clone()), store, cache)
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (service, _, _) = service();
        let tag = service.create_tag("  Rust Lang ").await.unwrap();

        assert_eq!(tag.name, "Rust Lang");
        assert_eq!(tag.slug, "rust-lang");

        let tags = service.list_tags(6, 0).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].slug, "rust-lang");
    }

    #[tokio::test]
    async fn test_duplicate_is_conflict() {
        let (service, _, _) = service();
        service.create_tag("Rust").await.unwrap();

        let err = service.create_tag("rust").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let (service, _, _) = service();
        let err = service.create_tag("  !! ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_create_clears_list_cache() {
        let (service, store, cache) = service();
        cache
            .get_public_list(store.as_ref(), &ListQuery::default())
            .await
            .unwrap();
        assert_eq!(cache.stats().list.total_entries, 1);

        service.create_tag("Async").await.unwrap();

        assert_eq!(cache.stats().list.total_entries, 0);
    }

    #[tokio::test]
    async fn test_search() {
        let (service, _, _) = service();
        service.create_tag("Rust").await.unwrap();
        service.create_tag("Ruby").await.unwrap();
        service.create_tag("Go").await.unwrap();

        let found = service.search_tags("ru", 6, 0).await.unwrap();
        assert_eq!(found.len(), 2);
    }
}
