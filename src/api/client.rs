//! Graph API client
//!
//! Wraps a `Transport` with the pieces every API call shares: the base URL,
//! the access token, JSON decoding, the error envelope and the pacing delay.

use crate::api::transport::{Query, RawResponse, Transport};
use crate::config::Config;
use crate::{CrawlerError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Error envelope returned by the Graph API on failure
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    error_subcode: Option<i64>,
}

/// Authenticated client for the Graph API
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    access_token: String,
    pace: Duration,
}

impl ApiClient {
    /// Creates a client from the loaded configuration
    pub fn new(transport: Arc<dyn Transport>, config: &Config) -> Self {
        Self::from_parts(
            transport,
            &config.api.base_url,
            config.access_token(),
            config.limits.pace(),
        )
    }

    pub fn from_parts(
        transport: Arc<dyn Transport>,
        base_url: &str,
        access_token: &str,
        pace: Duration,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            pace,
        }
    }

    /// The underlying transport, for requests outside the API (profile pages)
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Joins an API path such as `/123/threads` onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// GETs an API path with the given parameters plus the access token
    pub async fn get(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        let url = self.endpoint(path);
        let mut query: Query = params.to_vec();
        query.push(("access_token".to_string(), self.access_token.clone()));

        let raw = self.transport.get(&url, &query).await?;
        decode_response(&url, raw)
    }

    /// GETs a continuation URL exactly as the server returned it
    ///
    /// Cursor URLs carry their own parameters and token, so nothing is added.
    pub async fn get_url(&self, url: &str) -> Result<Value> {
        let raw = self.transport.get(url, &[]).await?;
        decode_response(url, raw)
    }

    /// Sleeps for the configured inter-request delay
    pub async fn pace(&self) {
        if !self.pace.is_zero() {
            tokio::time::sleep(self.pace).await;
        }
    }
}

/// Turns a raw response into JSON, or into `CrawlerError::Api` for status >= 400
fn decode_response(url: &str, raw: RawResponse) -> Result<Value> {
    if !raw.is_success() {
        let error = parse_api_error(raw.status, &raw.body);
        tracing::debug!("GET {} failed: {}", url, error);
        return Err(error);
    }

    Ok(serde_json::from_str(&raw.body)?)
}

/// Builds an API error from a failed response, reading the error envelope if present
pub fn parse_api_error(status: u16, body: &str) -> CrawlerError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => CrawlerError::Api {
            status,
            code: envelope.error.code,
            subcode: envelope.error.error_subcode,
            message: envelope
                .error
                .message
                .unwrap_or_else(|| "no message".to_string()),
        },
        Err(_) => CrawlerError::Api {
            status,
            code: None,
            subcode: None,
            message: body.chars().take(300).collect(),
        },
    }
}

/// Query parameter helper: `params(&[("fields", "id"), ("limit", "1")])`
pub fn params(pairs: &[(&str, &str)]) -> Query {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
