//! Integration Tests for API Endpoints
//!
//! Drives the full router and checks that cached public reads reflect every
//! admin write on the very next request.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use blog_cache::{api::create_router, cache::BlogReadCache, repository::MemoryStore, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let cache = BlogReadCache::new(100, Duration::from_secs(300)).unwrap();
    let state = AppState::with_store(store.clone(), cache);
    (create_router(state), store)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn create_blog(app: &Router, body: Value) -> Value {
    let (status, json) = send(app, "POST", "/api/private/blogs", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    json
}

// == Health & Stats ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_stats_count_list_hits() {
    let (app, _) = create_test_app();
    create_blog(&app, json!({"title": "First", "published": true})).await;

    send(&app, "GET", "/api/blogs", None).await;
    send(&app, "GET", "/api/blogs", None).await;
    send(&app, "GET", "/api/blogs?limit=2", None).await;

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["list"]["hits"], 1);
    assert_eq!(stats["list"]["misses"], 2);
    assert_eq!(stats["list"]["totalEntries"], 2);
    assert_eq!(stats["ttlSeconds"], 300);
}

// == Public reads ==

#[tokio::test]
async fn test_list_excludes_drafts() {
    let (app, _) = create_test_app();
    create_blog(&app, json!({"title": "Live", "published": true})).await;
    create_blog(&app, json!({"title": "Draft"})).await;

    let (status, json) = send(&app, "GET", "/api/blogs", None).await;

    assert_eq!(status, StatusCode::OK);
    let page = json.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["title"], "Live");
}

#[tokio::test]
async fn test_list_without_content() {
    let (app, _) = create_test_app();
    create_blog(
        &app,
        json!({"title": "Post", "content": "body", "published": true}),
    )
    .await;

    let (_, with_body) = send(&app, "GET", "/api/blogs", None).await;
    let (_, without_body) = send(&app, "GET", "/api/blogs?content=false", None).await;

    assert_eq!(with_body[0]["content"], "body");
    assert!(without_body[0].get("content").is_none());
}

#[tokio::test]
async fn test_get_blog_by_slug() {
    let (app, _) = create_test_app();
    create_blog(
        &app,
        json!({"title": "Hello World", "content": "hi", "published": true}),
    )
    .await;

    let (status, json) = send(&app, "GET", "/api/blogs/hello-world", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Hello World");
    assert!(json.get("createdAt").is_none());
}

#[tokio::test]
async fn test_get_missing_slug_not_found() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/api/blogs/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_pagination_validation() {
    let (app, _) = create_test_app();

    for uri in [
        "/api/blogs?limit=abc",
        "/api/blogs?limit=0",
        "/api/blogs?limit=51",
        "/api/blogs?offset=-3",
        "/api/blogs?sort=random",
    ] {
        let (status, json) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(json.get("error").is_some());
    }

    let (status, _) = send(&app, "GET", "/api/blogs?limit=50&offset=0", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_count_published() {
    let (app, _) = create_test_app();
    create_blog(&app, json!({"title": "One", "published": true})).await;
    create_blog(&app, json!({"title": "Two"})).await;

    let (_, json) = send(&app, "GET", "/api/blogs/count", None).await;
    assert_eq!(json["totalCount"], 1);
}

// == Invalidation ==

#[tokio::test]
async fn test_create_visible_on_next_list() {
    let (app, _) = create_test_app();
    create_blog(&app, json!({"title": "First", "published": true})).await;
    let (_, before) = send(&app, "GET", "/api/blogs", None).await;
    assert_eq!(before.as_array().unwrap().len(), 1);

    create_blog(&app, json!({"title": "Second", "published": true})).await;

    let (_, after) = send(&app, "GET", "/api/blogs", None).await;
    assert_eq!(after.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_visible_on_next_read() {
    let (app, _) = create_test_app();
    let blog = create_blog(&app, json!({"title": "Old", "published": true})).await;
    let id = blog["id"].as_str().unwrap();
    send(&app, "GET", "/api/blogs", None).await;
    send(&app, "GET", "/api/blogs/old", None).await;

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/private/blogs/{id}"),
        Some(json!({"title": "New", "slug": "new"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = send(&app, "GET", "/api/blogs", None).await;
    assert_eq!(list[0]["title"], "New");
    let (old_status, _) = send(&app, "GET", "/api/blogs/old", None).await;
    assert_eq!(old_status, StatusCode::NOT_FOUND);
    let (new_status, detail) = send(&app, "GET", "/api/blogs/new", None).await;
    assert_eq!(new_status, StatusCode::OK);
    assert_eq!(detail["title"], "New");
}

#[tokio::test]
async fn test_delete_visible_on_next_read() {
    let (app, _) = create_test_app();
    let blog = create_blog(&app, json!({"title": "Doomed", "published": true})).await;
    let id = blog["id"].as_str().unwrap();
    send(&app, "GET", "/api/blogs/doomed", None).await;

    let (status, json) = send(&app, "DELETE", &format!("/api/private/blogs/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (status, _) = send(&app, "GET", "/api/blogs/doomed", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, list) = send(&app, "GET", "/api/blogs", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_unknown_blog_not_found() {
    let (app, _) = create_test_app();
    let uri = "/api/private/blogs/00000000-0000-4000-8000-000000000000";

    let (status, _) = send(&app, "PATCH", uri, Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tag_create_clears_list_cache() {
    let (app, _) = create_test_app();
    create_blog(&app, json!({"title": "Post", "published": true})).await;
    send(&app, "GET", "/api/blogs", None).await;

    let (status, tag) = send(&app, "POST", "/api/private/tags", Some(json!({"name": "Rust"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tag["slug"], "rust");

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["list"]["totalEntries"], 0);

    let (status, _) = send(&app, "POST", "/api/private/tags", Some(json!({"name": "rust"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_tag_listing() {
    let (app, _) = create_test_app();
    let (_, tag) = send(&app, "POST", "/api/private/tags", Some(json!({"name": "Rust"}))).await;
    create_blog(
        &app,
        json!({"title": "Tagged", "content": "body", "published": true, "tagIds": [tag["id"]]}),
    )
    .await;
    create_blog(&app, json!({"title": "Plain", "published": true})).await;

    let (status, page) = send(&app, "GET", "/api/blogs/tag/rust", None).await;
    assert_eq!(status, StatusCode::OK);
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["title"], "Tagged");
    assert!(page[0].get("content").is_none());
    assert_eq!(page[0]["tags"][0]["slug"], "rust");

    let (status, empty) = send(&app, "GET", "/api/blogs/tag/unknown", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(empty.as_array().unwrap().is_empty());

    let (_, tags) = send(&app, "GET", "/api/tags", None).await;
    assert_eq!(tags.as_array().unwrap().len(), 1);

    let (_, found) = send(&app, "GET", "/api/private/tags/search?query=RU", None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cache_clear_endpoint() {
    let (app, _) = create_test_app();
    create_blog(&app, json!({"title": "Post", "published": true})).await;
    send(&app, "GET", "/api/blogs", None).await;
    send(&app, "GET", "/api/blogs/post", None).await;

    let (status, _) = send(&app, "POST", "/api/private/cache/clear", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["list"]["totalEntries"], 0);
    assert_eq!(stats["slug"]["totalEntries"], 0);
}

// == Admin ==

#[tokio::test]
async fn test_admin_reads_are_uncached() {
    let (app, _) = create_test_app();
    let draft = create_blog(&app, json!({"title": "Draft"})).await;
    let id = draft["id"].as_str().unwrap();

    let (status, list) = send(&app, "GET", "/api/private/blogs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, one) = send(&app, "GET", &format!("/api/private/blogs/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["title"], "Draft");

    let (status, by_slug) = send(&app, "GET", "/api/private/blogs/slug/draft", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_slug["id"], draft["id"]);

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["list"]["misses"], 0);
    assert_eq!(stats["slug"]["misses"], 0);
}

#[tokio::test]
async fn test_slug_tools() {
    let (app, _) = create_test_app();
    create_blog(&app, json!({"title": "My Post"})).await;

    let (status, generated) = send(
        &app,
        "POST",
        "/api/private/blogs/slugs/generate",
        Some(json!({"title": "My Post"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(generated["slug"], "my-post-2");

    let (_, taken) = send(
        &app,
        "POST",
        "/api/private/blogs/slugs/verify",
        Some(json!({"slug": "my-post"})),
    )
    .await;
    assert_eq!(taken["available"], false);

    let (status, _) = send(
        &app,
        "POST",
        "/api/private/blogs/slugs/generate",
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Store failures ==

#[tokio::test]
async fn test_store_outage_is_generic_500() {
    let (app, store) = create_test_app();
    store.set_unavailable(true);

    let (status, json) = send(&app, "GET", "/api/blogs", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Internal Server Error");

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["list"]["totalEntries"], 0);
}

#[tokio::test]
async fn test_cached_page_survives_store_outage() {
    let (app, store) = create_test_app();
    create_blog(&app, json!({"title": "Post", "published": true})).await;
    send(&app, "GET", "/api/blogs", None).await;

    store.set_unavailable(true);

    let (status, json) = send(&app, "GET", "/api/blogs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
}
