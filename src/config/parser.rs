use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use std::path::Path;

/// Environment variable holding the access token
pub const ACCESS_TOKEN_ENV: &str = "THREADS_ACCESS_TOKEN";

/// Loads and parses a configuration file from the given path
///
/// The access token from `THREADS_ACCESS_TOKEN` (including one loaded from a
/// `.env` file) replaces any `api.access-token` in the file.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use threads_crawler::config::load_config;
///
/// let config = load_config(Path::new("crawler.toml")).unwrap();
/// println!("Seeds: {:?}", config.seeds);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let mut config = parse_config_file(path)?;
    apply_env_token(&mut config);
    validate(&config)?;
    Ok(config)
}

/// Reads and parses a TOML configuration file without validating it
///
/// The CLI uses this when seeds or other values are still to be overridden
/// before validation.
pub fn parse_config_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}

/// Parses configuration from a TOML string without validating it
pub fn parse_config_str(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

/// Overrides the configured access token with `THREADS_ACCESS_TOKEN`, if set
///
/// Call `dotenvy::dotenv()` beforehand to pick up a `.env` file.
pub fn apply_env_token(config: &mut Config) {
    if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
        if !token.trim().is_empty() {
            config.api.access_token = Some(token);
        }
    }
}
