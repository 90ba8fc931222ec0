//! Scripted in-memory transport for unit tests

use crate::api::transport::{Query, RawResponse, Transport};
use crate::CrawlerError;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Replays canned responses keyed by URL (query string ignored) and records calls
///
/// Responses queued for a URL are returned in order; the last one repeats.
/// Unknown URLs get a 404 with a Graph-style error body.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<RawResponse>>>,
    calls: Mutex<Vec<(String, Query)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, status: u16, body: impl Into<String>) {
        self.routes
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(RawResponse {
                status,
                body: body.into(),
            });
    }

    pub fn respond_json(&self, url: &str, value: Value) {
        self.respond(url, 200, value.to_string());
    }

    pub fn respond_error(&self, url: &str, status: u16, code: Option<i64>, subcode: Option<i64>) {
        let body = json!({
            "error": {
                "message": "scripted failure",
                "code": code,
                "error_subcode": subcode,
            }
        });
        self.respond(url, status, body.to_string());
    }

    /// Every request made so far, in order
    pub fn calls(&self) -> Vec<(String, Query)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests made to `url`
    pub fn call_count(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _)| called == url)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, CrawlerError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), query.to_vec()));

        let mut routes = self.routes.lock().unwrap();
        let response = match routes.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        Ok(response.unwrap_or_else(|| RawResponse {
            status: 404,
            body: json!({"error": {"message": format!("no route for {}", url)}}).to_string(),
        }))
    }
}

/// A page envelope with the given items and optional continuation URL
pub fn page(items: Vec<Value>, next: Option<&str>) -> Value {
    match next {
        Some(next) => json!({"data": items, "paging": {"next": next}}),
        None => json!({"data": items}),
    }
}
