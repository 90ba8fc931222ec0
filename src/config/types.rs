use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Handles or numeric IDs to start from
    #[serde(default)]
    pub seeds: Vec<String>,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Handle -> numeric user ID overrides, checked before anything else
    #[serde(rename = "manual-ids", default)]
    pub manual_ids: HashMap<String, String>,
}

impl Config {
    /// Returns the access token, or an empty string if none was configured
    pub fn access_token(&self) -> &str {
        self.api.access_token.as_deref().unwrap_or("")
    }
}

/// Graph API endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Graph API, including the version segment
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Base URL of the public profile pages used for handle lookups
    #[serde(rename = "profile-base-url", default = "default_profile_base_url")]
    pub profile_base_url: String,

    /// Per-request deadline in seconds
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Access token; THREADS_ACCESS_TOKEN in the environment takes precedence
    #[serde(rename = "access-token", default)]
    pub access_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            profile_base_url: default_profile_base_url(),
            timeout_seconds: default_timeout_seconds(),
            access_token: None,
        }
    }
}

/// Per-resource item caps and request pacing
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(rename = "max-threads-per-user", default = "default_max_threads")]
    pub max_threads_per_user: usize,

    #[serde(rename = "max-replies-per-post", default = "default_max_replies")]
    pub max_replies_per_post: usize,

    #[serde(rename = "max-likes-per-post", default = "default_max_likes")]
    pub max_likes_per_post: usize,

    /// Fixed delay after every page fetch and after every post (milliseconds)
    #[serde(rename = "pace-ms", default = "default_pace_ms")]
    pub pace_ms: u64,

    #[serde(rename = "posts-page-size", default = "default_posts_page_size")]
    pub posts_page_size: usize,

    #[serde(rename = "replies-page-size", default = "default_replies_page_size")]
    pub replies_page_size: usize,

    #[serde(rename = "likes-page-size", default = "default_likes_page_size")]
    pub likes_page_size: usize,
}

impl LimitsConfig {
    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_ms)
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_threads_per_user: default_max_threads(),
            max_replies_per_post: default_max_replies(),
            max_likes_per_post: default_max_likes(),
            pace_ms: default_pace_ms(),
            posts_page_size: default_posts_page_size(),
            replies_page_size: default_replies_page_size(),
            likes_page_size: default_likes_page_size(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Parent directory; each run writes into a timestamped subdirectory
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_base_url() -> String {
    "https://graph.threads.net/v1.0".to_string()
}

fn default_profile_base_url() -> String {
    "https://www.threads.net".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_threads() -> usize {
    50
}

fn default_max_replies() -> usize {
    200
}

fn default_max_likes() -> usize {
    500
}

fn default_pace_ms() -> u64 {
    300
}

fn default_posts_page_size() -> usize {
    25
}

fn default_replies_page_size() -> usize {
    50
}

fn default_likes_page_size() -> usize {
    100
}

fn default_output_directory() -> String {
    "out".to_string()
}
