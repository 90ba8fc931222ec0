//! HTTP transport
//!
//! This module is the only place that touches the network:
//! - Building the `reqwest` client with a user agent and request deadline
//! - Issuing GET requests with query parameters
//! - Returning the raw status and body for the caller to interpret

use crate::config::ApiConfig;
use crate::CrawlerError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Query parameters for a GET request
pub type Query = Vec<(String, String)>;

/// Status code and body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// Blocking-in-order GET capability used by every fetch in the crawler
///
/// Implementations return `Err` only when no response was received at all
/// (connection failure, timeout). Any status code, including 4xx and 5xx, is
/// returned as a `RawResponse`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, CrawlerError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The API configuration (supplies the request deadline)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ApiConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!("threads-crawler/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Transport` backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration and wraps it
    pub fn from_config(config: &ApiConfig) -> Result<Self, CrawlerError> {
        let client = build_http_client(config).map_err(|source| CrawlerError::Http {
            url: config.base_url.clone(),
            source,
        })?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<RawResponse, CrawlerError> {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|source| {
            if source.is_timeout() {
                tracing::warn!("Request timeout for {}", url);
            }
            CrawlerError::Http {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|source| CrawlerError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(RawResponse { status, body })
    }
}
