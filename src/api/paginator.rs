//! Cursor-following pagination over Graph API collections
//!
//! A `Paginator` is a lazy, single-pass cursor: nothing is requested until
//! the first `next_item` call, and each further page is requested only when
//! the items already fetched have been handed out. Dropping it early is the
//! normal way to stop; no further requests are made.

use crate::api::client::ApiClient;
use crate::api::transport::Query;
use crate::{CrawlerError, Result};
use serde_json::Value;
use std::collections::{HashSet, VecDeque};

#[derive(Debug)]
enum PageRequest {
    Initial { path: String, params: Query },
    Cursor(String),
}

/// Lazy sequence of records from a paginated collection
pub struct Paginator<'a> {
    client: &'a ApiClient,
    next_request: Option<PageRequest>,
    buffer: VecDeque<Value>,
    pages_fetched: usize,
    max_pages: Option<usize>,
    followed_cursors: HashSet<String>,
}

impl<'a> Paginator<'a> {
    /// Prepares a paginated walk of `path` with the given query parameters
    pub fn new(client: &'a ApiClient, path: &str, params: Query) -> Self {
        Self {
            client,
            next_request: Some(PageRequest::Initial {
                path: path.to_string(),
                params,
            }),
            buffer: VecDeque::new(),
            pages_fetched: 0,
            max_pages: None,
            followed_cursors: HashSet::new(),
        }
    }

    /// Stops following cursors after `max_pages` pages have been fetched
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// True while buffered items remain or another page can be requested
    pub fn has_more(&self) -> bool {
        !self.buffer.is_empty() || self.next_request.is_some()
    }

    /// Number of page requests issued so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Returns the next record, fetching the next page when the buffer is empty
    ///
    /// Returns `Ok(None)` once the last page (one without a continuation
    /// cursor) has been drained. A failed page request ends the sequence.
    pub async fn next_item(&mut self) -> Result<Option<Value>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }

            let Some(request) = self.next_request.take() else {
                return Ok(None);
            };

            let (url, page) = match request {
                PageRequest::Initial { path, params } => {
                    let url = self.client.endpoint(&path);
                    let page = self.client.get(&path, &params).await?;
                    (url, page)
                }
                PageRequest::Cursor(url) => {
                    let page = self.client.get_url(&url).await?;
                    (url, page)
                }
            };

            self.pages_fetched += 1;
            self.absorb(&url, page)?;
            self.client.pace().await;
        }
    }

    /// Buffers a page's items and records its continuation cursor
    fn absorb(&mut self, url: &str, mut page: Value) -> Result<()> {
        match page.get_mut("data").map(Value::take) {
            Some(Value::Array(items)) => self.buffer.extend(items),
            Some(Value::Null) | None => {}
            Some(other) => {
                return Err(CrawlerError::UnexpectedPayload {
                    url: url.to_string(),
                    message: format!("expected `data` to be an array, got {}", other),
                })
            }
        }

        let next = page
            .get("paging")
            .and_then(|paging| paging.get("next"))
            .and_then(Value::as_str)
            .filter(|next| !next.is_empty())
            .map(str::to_string);

        if let Some(max) = self.max_pages {
            if self.pages_fetched >= max {
                return Ok(());
            }
        }

        if let Some(next) = next {
            if !self.followed_cursors.insert(next.clone()) {
                tracing::warn!("Cursor repeated for {}, stopping pagination", url);
                return Ok(());
            }
            self.next_request = Some(PageRequest::Cursor(next));
        }

        Ok(())
    }
}

/// Pulls at most `cap` records from the paginator
///
/// The cap is checked before each pull, so once `cap` records are held no
/// further page is requested.
pub async fn collect_capped(pager: &mut Paginator<'_>, cap: usize) -> Result<Vec<Value>> {
    let mut items = Vec::new();
    while items.len() < cap {
        match pager.next_item().await? {
            Some(item) => items.push(item),
            None => break,
        }
    }
    Ok(items)
}
