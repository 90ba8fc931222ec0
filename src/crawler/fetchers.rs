//! Bounded fetchers for posts, replies, likes and profiles
//!
//! Each fetcher is a `Paginator` over one collection with a fixed field list
//! and a page-size hint, truncated at a caller-supplied cap. Errors are
//! returned as-is; whether a failure is fatal is the caller's decision.

use crate::api::{collect_capped, params, ApiClient, Paginator};
use crate::model::{Like, Post, Reply};
use crate::Result;
use serde_json::Value;

pub const POST_FIELDS: &str =
    "id,text,caption,permalink,created_time,media_type,like_count,reply_count,author";
pub const REPLY_FIELDS: &str = "id,text,permalink,created_time,author,like_count,reply_count";
pub const LIKE_FIELDS: &str = "id,username";
pub const USER_FIELDS: &str = "id,username,verified";

/// Fetches up to `cap` raw records from `path`
///
/// The `limit` hint never exceeds the cap, so small caps cost one small page.
async fn fetch_bounded(
    client: &ApiClient,
    path: &str,
    fields: &str,
    page_size: usize,
    cap: usize,
) -> Result<Vec<Value>> {
    if cap == 0 {
        return Ok(Vec::new());
    }

    let limit = page_size.min(cap).max(1).to_string();
    let query = params(&[("fields", fields), ("limit", limit.as_str())]);
    let mut pager = Paginator::new(client, path, query);
    let items = collect_capped(&mut pager, cap).await?;

    tracing::debug!(
        "{}: {} items over {} pages",
        path,
        items.len(),
        pager.pages_fetched()
    );
    Ok(items)
}

/// Fetches up to `cap` posts of `user_id` (or `me`)
///
/// `fallback_author` fills `author_id` for posts whose payload has no author.
pub async fn fetch_posts(
    client: &ApiClient,
    user_id: &str,
    cap: usize,
    page_size: usize,
    fallback_author: Option<&str>,
) -> Result<Vec<Post>> {
    let path = format!("/{}/threads", user_id);
    let items = fetch_bounded(client, &path, POST_FIELDS, page_size, cap).await?;
    Ok(items
        .iter()
        .map(|item| Post::from_api(item, fallback_author))
        .collect())
}

/// Fetches up to `cap` replies to `post_id`
pub async fn fetch_replies(
    client: &ApiClient,
    post_id: &str,
    cap: usize,
    page_size: usize,
) -> Result<Vec<Reply>> {
    let path = format!("/{}/replies", post_id);
    let items = fetch_bounded(client, &path, REPLY_FIELDS, page_size, cap).await?;
    Ok(items
        .iter()
        .map(|item| Reply::from_api(post_id, item))
        .collect())
}

/// Fetches up to `cap` likes on `post_id`
pub async fn fetch_likes(
    client: &ApiClient,
    post_id: &str,
    cap: usize,
    page_size: usize,
) -> Result<Vec<Like>> {
    let path = format!("/{}/likes", post_id);
    let items = fetch_bounded(client, &path, LIKE_FIELDS, page_size, cap).await?;
    Ok(items
        .iter()
        .map(|item| Like::from_api(post_id, item))
        .collect())
}

/// Fetches `{id, username, verified}` for a user
pub async fn fetch_profile(client: &ApiClient, user_id: &str) -> Result<Value> {
    client
        .get(&format!("/{}", user_id), &params(&[("fields", USER_FIELDS)]))
        .await
}
