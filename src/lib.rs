//! threads-crawler: a seed-based Threads content collector
//!
//! This crate resolves a list of seed handles to numeric user IDs, walks each
//! user's posts through the Graph API and flattens posts, replies and likes
//! into per-run CSV files. Requests are issued one at a time with a fixed
//! pacing delay so a single access token stays under the platform rate limit.

pub mod api;
pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod search;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        subcode: Option<i64>,
        message: String,
    },

    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected payload from {url}: {message}")]
    UnexpectedPayload { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrawlerError {
    /// Returns the Graph API `(code, error_subcode)` pair, if this is an API error
    pub fn api_codes(&self) -> Option<(Option<i64>, Option<i64>)> {
        match self {
            CrawlerError::Api { code, subcode, .. } => Some((*code, *subcode)),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing access token: set THREADS_ACCESS_TOKEN or api.access-token")]
    MissingCredential,
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, IdentityResolver};
pub use model::{Identity, Like, Post, Reply};
pub use output::{CrawlStatistics, OutputSet};
