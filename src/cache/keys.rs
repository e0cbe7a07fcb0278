//! Cache key construction for blog reads.
//!
//! Keys are plain strings so they read well in logs. Tag filters are sorted
//! before joining, which makes the key independent of input order, and carry
//! a `tags=` prefix so a tag slugged `all` never maps onto the unfiltered view.

use crate::models::ListQuery;

const LIST_PREFIX: &str = "blogs:list:";
const SLUG_PREFIX: &str = "blogs:slug:";

/// Key for one page of one filtered, sorted view of published blogs.
pub fn build_list_key(query: &ListQuery) -> String {
    let tags = if query.tag_slugs.is_empty() {
        "all".to_string()
    } else {
        let mut slugs: Vec<&str> = query.tag_slugs.iter().map(String::as_str).collect();
        slugs.sort_unstable();
        slugs.dedup();
        format!("tags={}", slugs.join(","))
    };

    let mut key = format!(
        "{LIST_PREFIX}{tags}:sort={}:limit={}:offset={}",
        query.sort.as_key(),
        query.limit,
        query.offset
    );
    if !query.include_content {
        key.push_str(":content=0");
    }
    key
}

/// Key for one published blog looked up by slug.
pub fn build_slug_key(slug: &str) -> String {
    format!("{SLUG_PREFIX}{slug}")
}
