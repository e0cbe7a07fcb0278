//! API Handlers
//!
//! HTTP request handlers for the public blog API and the admin dashboard.
//! Handlers validate input, call a service, and map the result to JSON.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::cache::BlogReadCache;
use crate::config::{Config, ConfigError};
use crate::error::{AppError, Result};
use crate::models::{
    AdminBlog, AdminListParams, Blog, BlogDetail, BlogPatch, BlogSummary, CountResponse,
    CreateBlogRequest, CreateTagRequest, GenerateSlugRequest, HealthResponse, ListParams,
    ListQuery, MessageResponse, PageParams, PublicTag, SlugAvailabilityResponse, SlugResponse,
    StatsResponse, Tag, TagSearchParams, VerifySlugRequest,
};
use crate::models::requests::parse_pagination;
use crate::repository::{BlogRepository, MemoryStore, TagRepository};
use crate::services::{BlogService, TagService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub blogs: Arc<BlogService>,
    pub tags: Arc<TagService>,
    pub cache: Arc<BlogReadCache>,
}

impl AppState {
    /// Wires both services to the given repositories and a shared cache.
    pub fn new(
        blog_repo: Arc<dyn BlogRepository>,
        tag_repo: Arc<dyn TagRepository>,
        cache: BlogReadCache,
    ) -> Self {
        let cache = Arc::new(cache);
        Self {
            blogs: Arc::new(BlogService::new(
                blog_repo,
                Arc::clone(&tag_repo),
                Arc::clone(&cache),
            )),
            tags: Arc::new(TagService::new(tag_repo, Arc::clone(&cache))),
            cache,
        }
    }

    /// Backs both repositories with one [`MemoryStore`].
    pub fn with_store(store: Arc<MemoryStore>, cache: BlogReadCache) -> Self {
        Self::new(store.clone(), store, cache)
    }

    /// Creates state from configuration over a fresh in-memory store.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let cache = BlogReadCache::from_config(config)?;
        Ok(Self::with_store(Arc::new(MemoryStore::new()), cache))
    }
}

fn invalid(message: String) -> AppError {
    AppError::InvalidRequest(message)
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| invalid(format!("Invalid blog id '{}'", raw)))
}

// == Service endpoints ==

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /stats
///
/// Returns hit/miss counters for the list and slug caches.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    Json(StatsResponse::new(&stats, state.cache.ttl().as_secs()))
}

// == Public blog endpoints ==

/// Handler for GET /api/blogs
pub async fn list_blogs_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<BlogSummary>>> {
    let query = params.to_list_query().map_err(invalid)?;
    Ok(Json(state.blogs.list_public_blogs(&query).await?))
}

/// Handler for GET /api/blogs/count
pub async fn count_blogs_handler(State(state): State<AppState>) -> Result<Json<CountResponse>> {
    let total_count = state.blogs.count_blogs(true).await?;
    Ok(Json(CountResponse { total_count }))
}

/// Handler for GET /api/blogs/:slug
pub async fn get_blog_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogDetail>> {
    Ok(Json(state.blogs.get_public_blog_by_slug(&slug).await?))
}

/// Handler for GET /api/blogs/tag/:tag_slug
///
/// Tag pages never carry post bodies.
pub async fn blogs_by_tag_handler(
    State(state): State<AppState>,
    Path(tag_slug): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<BlogSummary>>> {
    let (limit, offset) = params.pagination().map_err(invalid)?;
    let query = ListQuery::new(limit, offset).without_content();
    Ok(Json(
        state.blogs.filter_public_blogs_by_tag(&tag_slug, query).await?,
    ))
}

/// Handler for GET /api/tags
pub async fn list_tags_handler(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<PublicTag>>> {
    let (limit, offset) = params.pagination().map_err(invalid)?;
    Ok(Json(state.tags.list_tags(limit, offset).await?))
}

// == Admin blog endpoints ==

/// Handler for GET /api/private/blogs
pub async fn admin_list_blogs_handler(
    State(state): State<AppState>,
    Query(params): Query<AdminListParams>,
) -> Result<Json<Vec<AdminBlog>>> {
    let query = params.to_admin_query().map_err(invalid)?;
    Ok(Json(state.blogs.list_admin_blogs(&query).await?))
}

/// Handler for GET /api/private/blogs/tag/:tag_slug
pub async fn admin_blogs_by_tag_handler(
    State(state): State<AppState>,
    Path(tag_slug): Path<String>,
    Query(params): Query<AdminListParams>,
) -> Result<Json<Vec<AdminBlog>>> {
    let query = params.to_admin_query().map_err(invalid)?;
    Ok(Json(
        state.blogs.filter_admin_blogs_by_tag(&tag_slug, query).await?,
    ))
}

/// Handler for GET /api/private/blogs/slug/:slug
pub async fn admin_get_blog_by_slug_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<AdminBlog>> {
    Ok(Json(state.blogs.get_admin_blog_by_slug(&slug).await?))
}

/// Handler for GET /api/private/blogs/:id
pub async fn admin_get_blog_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AdminBlog>> {
    let id = parse_id(&id)?;
    Ok(Json(state.blogs.get_admin_blog(id).await?))
}

/// Handler for POST /api/private/blogs
pub async fn create_blog_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateBlogRequest>,
) -> Result<(StatusCode, Json<Blog>)> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let blog = state.blogs.create_blog(req).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

/// Handler for PATCH /api/private/blogs/:id
pub async fn update_blog_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<BlogPatch>,
) -> Result<Json<Blog>> {
    let id = parse_id(&id)?;
    if let Some(error_msg) = patch.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    Ok(Json(state.blogs.update_blog(id, patch).await?))
}

/// Handler for DELETE /api/private/blogs/:id
pub async fn delete_blog_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    let blog = state.blogs.delete_blog(id).await?;
    Ok(Json(MessageResponse::ok(format!(
        "Blog '{}' deleted successfully",
        blog.slug
    ))))
}

/// Handler for POST /api/private/blogs/slugs/generate
pub async fn generate_slug_handler(
    State(state): State<AppState>,
    Json(req): Json<GenerateSlugRequest>,
) -> Result<Json<SlugResponse>> {
    let title = req
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| invalid("Title is required".to_string()))?;

    let slug = state.blogs.generate_slug(&title).await?;
    Ok(Json(SlugResponse { slug }))
}

/// Handler for POST /api/private/blogs/slugs/verify
pub async fn verify_slug_handler(
    State(state): State<AppState>,
    Json(req): Json<VerifySlugRequest>,
) -> Result<Json<SlugAvailabilityResponse>> {
    let slug = req
        .slug
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid("Slug is required".to_string()))?;

    let available = state.blogs.verify_slug(&slug).await?;
    Ok(Json(SlugAvailabilityResponse { available }))
}

// == Admin tag endpoints ==

/// Handler for POST /api/private/tags
pub async fn create_tag_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>)> {
    let name = req
        .name
        .ok_or_else(|| invalid("Tag name is required".to_string()))?;

    let tag = state.tags.create_tag(&name).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Handler for GET /api/private/tags/search
pub async fn search_tags_handler(
    State(state): State<AppState>,
    Query(params): Query<TagSearchParams>,
) -> Result<Json<Vec<Tag>>> {
    let (limit, offset) =
        parse_pagination(params.limit.as_deref(), params.offset.as_deref()).map_err(invalid)?;
    let prefix = params.query.unwrap_or_default();

    Ok(Json(state.tags.search_tags(&prefix, limit, offset).await?))
}

/// Handler for POST /api/private/cache/clear
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.invalidate_all();
    Json(MessageResponse::ok("Cache cleared"))
}
