//! Blog domain types and the request/response models for the HTTP API
//!
//! This module defines the stored records, their public and admin
//! projections, and the DTOs used for serializing/deserializing HTTP
//! request and response bodies.

mod blog;
pub mod requests;
pub mod responses;

pub use blog::{
    AdminBlog, AdminListQuery, Author, Blog, BlogDetail, BlogPatch, BlogSummary, ListQuery,
    NewBlog, PublicTag, SortOrder, Tag, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};
pub use requests::{
    AdminListParams, CreateBlogRequest, CreateTagRequest, GenerateSlugRequest, ListParams,
    PageParams, TagSearchParams, UpdateBlogRequest, VerifySlugRequest,
};
pub use responses::{
    CacheStatsResponse, CountResponse, ErrorResponse, HealthResponse, MessageResponse,
    SlugAvailabilityResponse, SlugResponse, StatsResponse,
};
