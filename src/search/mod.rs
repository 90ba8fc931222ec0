//! Keyword search over public posts
//!
//! Runs `/keyword_search` with an optional time window and page limit and
//! writes the matches to `search.csv` in a fresh run directory.

use crate::api::{collect_capped, ApiClient, Paginator, Query};
use crate::model::Post;
use crate::output::{create_run_dir, TabularSink, POST_COLUMNS};
use crate::Result;
use std::path::{Path, PathBuf};

pub const SEARCH_FIELDS: &str =
    "id,text,permalink,created_time,media_type,author,like_count,reply_count";

/// A keyword search request
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub keyword: String,
    /// Lower bound on post time (ISO 8601 or unix timestamp)
    pub since: Option<String>,
    /// Upper bound on post time (ISO 8601 or unix timestamp)
    pub until: Option<String>,
    pub page_size: usize,
    /// Stop after this many pages; `None` follows cursors to the end
    pub max_pages: Option<usize>,
}

impl SearchQuery {
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            since: None,
            until: None,
            page_size: 25,
            max_pages: Some(1),
        }
    }

    fn to_params(&self) -> Query {
        let mut query = vec![
            ("q".to_string(), self.keyword.clone()),
            ("fields".to_string(), SEARCH_FIELDS.to_string()),
            ("limit".to_string(), self.page_size.max(1).to_string()),
        ];
        if let Some(since) = &self.since {
            query.push(("since".to_string(), since.clone()));
        }
        if let Some(until) = &self.until {
            query.push(("until".to_string(), until.clone()));
        }
        query
    }
}

/// Runs a keyword search and returns the matched posts in server order
pub async fn keyword_search(client: &ApiClient, query: &SearchQuery) -> Result<Vec<Post>> {
    let mut pager = Paginator::new(client, "/keyword_search", query.to_params())
        .with_max_pages(query.max_pages);
    let items = collect_capped(&mut pager, usize::MAX).await?;

    tracing::info!(
        "Found {} posts for keyword '{}' over {} pages",
        items.len(),
        query.keyword,
        pager.pages_fetched()
    );

    Ok(items.iter().map(|item| Post::from_api(item, None)).collect())
}

/// Runs a search and writes `search.csv` into a new run directory under `parent`
///
/// Returns the path of the written file and the posts.
pub async fn run_search(
    client: &ApiClient,
    query: &SearchQuery,
    parent: &Path,
) -> Result<(PathBuf, Vec<Post>)> {
    let posts = keyword_search(client, query).await?;

    let dir = create_run_dir(parent)?;
    let path = dir.join("search.csv");
    let mut sink = TabularSink::create(&path, POST_COLUMNS)?;
    for post in &posts {
        sink.write(post)?;
    }
    sink.close()?;

    for (i, post) in posts.iter().take(10).enumerate() {
        tracing::info!(
            "{:02}. {}  {}",
            i + 1,
            post.created_time.as_deref().unwrap_or("-"),
            post.permalink.as_deref().unwrap_or("-")
        );
    }

    Ok((path, posts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{page, ScriptedTransport};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    const SEARCH_URL: &str = "https://graph.test/v1.0/keyword_search";

    fn client(transport: &Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::from_parts(transport.clone(), "https://graph.test/v1.0", "tok", Duration::ZERO)
    }

    #[tokio::test]
    async fn test_search_sends_window_and_respects_page_limit() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_json(
            SEARCH_URL,
            page(
                vec![json!({"id": "1", "permalink": "https://t/1"})],
                Some("https://graph.test/search/2"),
            ),
        );
        transport.respond_json(
            "https://graph.test/search/2",
            page(vec![json!({"id": "2"})], None),
        );

        let query = SearchQuery {
            since: Some("2025-09-01T00:00:00Z".to_string()),
            ..SearchQuery::new("Taipei startup")
        };
        let posts = keyword_search(&client(&transport), &query).await.unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(transport.calls().len(), 1);
        let (_, params) = &transport.calls()[0];
        assert!(params.contains(&("q".to_string(), "Taipei startup".to_string())));
        assert!(params.contains(&("since".to_string(), "2025-09-01T00:00:00Z".to_string())));
        assert!(!params.iter().any(|(k, _)| k == "until"));
    }

    #[tokio::test]
    async fn test_unbounded_search_follows_cursors() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_json(
            SEARCH_URL,
            page(vec![json!({"id": "1"})], Some("https://graph.test/search/2")),
        );
        transport.respond_json(
            "https://graph.test/search/2",
            page(vec![json!({"id": "2"})], None),
        );

        let query = SearchQuery {
            max_pages: None,
            ..SearchQuery::new("rust")
        };
        let posts = keyword_search(&client(&transport), &query).await.unwrap();
        assert_eq!(posts.len(), 2);
    }

    #[tokio::test]
    async fn test_run_search_writes_csv() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond_json(
            SEARCH_URL,
            page(vec![json!({"id": "1", "text": "multi\nline"})], None),
        );
        let parent = TempDir::new().unwrap();

        let (path, posts) = run_search(&client(&transport), &SearchQuery::new("x"), parent.path())
            .await
            .unwrap();

        assert_eq!(posts.len(), 1);
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().nth(1), Some("1,,,,,,,multi line"));
    }
}
