//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and layering the access token from the environment on top.
//!
//! # Example
//!
//! ```no_run
//! use threads_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Posts per user: {}", config.limits.max_threads_per_user);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Config, LimitsConfig, OutputConfig};

// Re-export parser functions
pub use parser::{
    apply_env_token, load_config, parse_config_file, parse_config_str, ACCESS_TOKEN_ENV,
};
pub use validation::{validate, validate_for_search};
