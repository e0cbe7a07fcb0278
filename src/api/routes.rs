//! API Routes
//!
//! Configures the Axum router with the public and admin endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    admin_blogs_by_tag_handler, admin_get_blog_by_slug_handler, admin_get_blog_handler,
    admin_list_blogs_handler, blogs_by_tag_handler, clear_cache_handler, count_blogs_handler,
    create_blog_handler, create_tag_handler, delete_blog_handler, generate_slug_handler,
    get_blog_handler, health_handler, list_blogs_handler, list_tags_handler,
    search_tags_handler, stats_handler, update_blog_handler, verify_slug_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .merge(public_routes())
        .merge(admin_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/blogs", get(list_blogs_handler))
        .route("/api/blogs/count", get(count_blogs_handler))
        .route("/api/blogs/tag/:tag_slug", get(blogs_by_tag_handler))
        .route("/api/blogs/:slug", get(get_blog_handler))
        .route("/api/tags", get(list_tags_handler))
}

// Callers are expected to sit behind an authenticating proxy.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/private/blogs",
            get(admin_list_blogs_handler).post(create_blog_handler),
        )
        .route(
            "/api/private/blogs/slugs/generate",
            post(generate_slug_handler),
        )
        .route("/api/private/blogs/slugs/verify", post(verify_slug_handler))
        .route(
            "/api/private/blogs/tag/:tag_slug",
            get(admin_blogs_by_tag_handler),
        )
        .route(
            "/api/private/blogs/slug/:slug",
            get(admin_get_blog_by_slug_handler),
        )
        .route(
            "/api/private/blogs/:id",
            get(admin_get_blog_handler)
                .patch(update_blog_handler)
                .delete(delete_blog_handler),
        )
        .route("/api/private/tags", post(create_tag_handler))
        .route("/api/private/tags/search", get(search_tags_handler))
        .route("/api/private/cache/clear", post(clear_cache_handler))
}
