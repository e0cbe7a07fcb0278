//! Request DTOs for the blog API
//!
//! Defines the structure of incoming query strings and JSON bodies. Numeric
//! query parameters arrive as strings so malformed values can be reported
//! with the same JSON error shape as every other validation failure.

use serde::Deserialize;
use uuid::Uuid;

use crate::models::{
    AdminListQuery, BlogPatch, ListQuery, SortOrder, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};

/// Parses `limit`/`offset`, applying the defaults (6 and 0).
///
/// Returns an error message for non-numeric values, a zero limit, or a limit
/// above the maximum page size.
pub fn parse_pagination(
    limit: Option<&str>,
    offset: Option<&str>,
) -> Result<(u32, u32), String> {
    let limit = match limit.filter(|v| !v.is_empty()) {
        None => DEFAULT_PAGE_LIMIT,
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| "Invalid limit or offset".to_string())?,
    };
    let offset = match offset.filter(|v| !v.is_empty()) {
        None => 0,
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| "Invalid limit or offset".to_string())?,
    };

    if limit == 0 {
        return Err("Limit must be at least 1".to_string());
    }
    if limit > MAX_PAGE_LIMIT {
        return Err(format!("Limit cannot be more than {}", MAX_PAGE_LIMIT));
    }
    Ok((limit, offset))
}

/// Query string for paged endpoints without extra filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PageParams {
    pub fn pagination(&self) -> Result<(u32, u32), String> {
        parse_pagination(self.limit.as_deref(), self.offset.as_deref())
    }
}

/// Query string for the public blog listing.
///
/// # Fields
/// - `limit`, `offset`: paging
/// - `sort`: `published` (default) or `created`
/// - `content`: `false` drops post bodies from the page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub sort: Option<String>,
    pub content: Option<String>,
}

impl ListParams {
    pub fn to_list_query(&self) -> Result<ListQuery, String> {
        let (limit, offset) = parse_pagination(self.limit.as_deref(), self.offset.as_deref())?;

        let sort = match self.sort.as_deref() {
            None | Some("") | Some("published") => SortOrder::Published,
            Some("created") => SortOrder::Created,
            Some(other) => return Err(format!("Unknown sort order '{}'", other)),
        };

        let include_content = match self.content.as_deref() {
            None | Some("") | Some("true") | Some("1") => true,
            Some("false") | Some("0") => false,
            Some(other) => return Err(format!("Invalid content flag '{}'", other)),
        };

        let mut query = ListQuery::new(limit, offset).with_sort(sort);
        query.include_content = include_content;
        Ok(query)
    }
}

/// Query string for the admin listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    /// `true` restricts the listing to published posts
    pub published: Option<String>,
}

impl AdminListParams {
    pub fn to_admin_query(&self) -> Result<AdminListQuery, String> {
        let (limit, offset) = parse_pagination(self.limit.as_deref(), self.offset.as_deref())?;

        Ok(AdminListQuery {
            tag_slugs: Vec::new(),
            limit,
            offset,
            published_only: self.published.as_deref() == Some("true"),
            include_content: true,
        })
    }
}

/// Query string for the admin tag search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagSearchParams {
    pub query: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Request body for creating a blog (POST /api/private/blogs).
///
/// Every field is optional: an empty body creates an untitled draft.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub short_description: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    pub author_id: Option<Uuid>,
}

impl CreateBlogRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Some("Title cannot be empty".to_string());
            }
        }
        self.slug.as_deref().and_then(validate_slug)
    }
}

/// Request body for PATCH /api/private/blogs/{id}.
pub type UpdateBlogRequest = BlogPatch;

impl BlogPatch {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Some("Title cannot be empty".to_string());
            }
        }
        self.slug.as_deref().and_then(validate_slug)
    }
}

/// Request body for POST /api/private/blogs/slugs/generate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateSlugRequest {
    pub title: Option<String>,
}

/// Request body for POST /api/private/blogs/slugs/verify.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifySlugRequest {
    pub slug: Option<String>,
}

/// Request body for POST /api/private/tags.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTagRequest {
    pub name: Option<String>,
}

/// A slug must already be in canonical form: lowercase ASCII words joined
/// by single hyphens.
fn validate_slug(slug: &str) -> Option<String> {
    if slug.is_empty() {
        return Some("Slug cannot be empty".to_string());
    }
    if slug::slugify(slug) != slug {
        return Some(format!("Slug '{}' is not URL-safe", slug));
    }
    None
}
