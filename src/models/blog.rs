//! Blog domain records and their public/admin projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default page size when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u32 = 6;

/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 50;

// == Stored records ==

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Author projection embedded in blog responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub author_id: Option<Uuid>,
    pub content: String,
    pub short_description: String,
    /// Set once the post is published; `None` means draft.
    pub date_published: Option<DateTime<Utc>>,
    pub tag_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Blog {
    pub fn is_published(&self) -> bool {
        self.date_published.is_some()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

// == Public projections ==
// Readers never see creation or deletion timestamps.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicTag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub updated_at: DateTime<Utc>,
}

impl From<&Tag> for PublicTag {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
            slug: tag.slug.clone(),
            updated_at: tag.updated_at,
        }
    }
}

/// One row of a published blog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    /// Omitted when the listing was requested without bodies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub short_description: String,
    pub date_published: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<PublicTag>,
    pub author: Option<Author>,
}

/// A single published blog with its tags and author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogDetail {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub short_description: String,
    pub date_published: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<PublicTag>,
    pub author: Option<Author>,
}

// == Admin projection ==

/// Every stored field, for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBlog {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: Option<String>,
    pub short_description: String,
    pub date_published: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub tags: Vec<Tag>,
    pub author: Option<Author>,
}

// == Queries ==

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest publication date first
    #[default]
    Published,
    /// Newest creation date first
    Created,
}

impl SortOrder {
    /// Stable label used in cache keys.
    pub fn as_key(self) -> &'static str {
        match self {
            SortOrder::Published => "publishedAt:desc",
            SortOrder::Created => "createdAt:desc",
        }
    }
}

/// Shape of one page of the published listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Posts must carry every one of these tags. Empty means no filter.
    pub tag_slugs: Vec<String>,
    pub limit: u32,
    pub offset: u32,
    pub sort: SortOrder,
    pub include_content: bool,
}

impl ListQuery {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            tag_slugs: Vec::new(),
            limit,
            offset,
            sort: SortOrder::default(),
            include_content: true,
        }
    }

    pub fn with_tag(mut self, tag_slug: impl Into<String>) -> Self {
        self.tag_slugs.push(tag_slug.into());
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn without_content(mut self) -> Self {
        self.include_content = false;
        self
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT, 0)
    }
}

/// Dashboard listing. Never served from cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminListQuery {
    pub tag_slugs: Vec<String>,
    pub limit: u32,
    pub offset: u32,
    /// Restrict to published posts only
    pub published_only: bool,
    pub include_content: bool,
}

// == Mutations ==

#[derive(Debug, Clone, PartialEq)]
pub struct NewBlog {
    pub title: String,
    pub slug: String,
    pub author_id: Option<Uuid>,
    pub content: String,
    pub short_description: String,
    pub date_published: Option<DateTime<Utc>>,
    pub tag_ids: Vec<Uuid>,
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub short_description: Option<String>,
    /// `true` publishes (keeping an existing date), `false` reverts to draft
    pub published: Option<bool>,
    pub tag_ids: Option<Vec<Uuid>>,
}

impl BlogPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
