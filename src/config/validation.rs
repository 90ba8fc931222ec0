use crate::config::types::{ApiConfig, Config, LimitsConfig, OutputConfig};
use crate::{ConfigError, ConfigResult};
use std::collections::HashMap;
use url::Url;

/// Validates the entire configuration
///
/// Runs before any network activity; every failure here is fatal.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_seeds(&config.seeds)?;
    validate_for_search(config)
}

/// Validates everything except the seed list, for keyword search runs
pub fn validate_for_search(config: &Config) -> ConfigResult<()> {
    validate_credential(config)?;
    validate_api_config(&config.api)?;
    validate_limits(&config.limits)?;
    validate_output_config(&config.output)?;
    validate_manual_ids(&config.manual_ids)?;
    Ok(())
}

fn validate_credential(config: &Config) -> ConfigResult<()> {
    if config.access_token().trim().is_empty() {
        return Err(ConfigError::MissingCredential);
    }
    Ok(())
}

/// Validates the seed list
fn validate_seeds(seeds: &[String]) -> ConfigResult<()> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed handle or user ID is required".to_string(),
        ));
    }

    for seed in seeds {
        let handle = seed.trim().trim_start_matches('@');
        if handle.is_empty() {
            return Err(ConfigError::Validation(format!(
                "seed '{}' is empty",
                seed
            )));
        }
        if handle.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "seed '{}' must not contain whitespace",
                seed
            )));
        }
    }

    Ok(())
}

/// Validates API endpoint configuration
fn validate_api_config(config: &ApiConfig) -> ConfigResult<()> {
    Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;
    Url::parse(&config.profile_base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid profile-base-url: {}", e)))?;

    if config.timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "timeout-seconds must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates caps and page sizes
///
/// Caps of zero are allowed and simply skip that resource.
fn validate_limits(config: &LimitsConfig) -> ConfigResult<()> {
    for (name, size) in [
        ("posts-page-size", config.posts_page_size),
        ("replies-page-size", config.replies_page_size),
        ("likes-page-size", config.likes_page_size),
    ] {
        if size == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got 0",
                name
            )));
        }
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates the handle -> ID override table
fn validate_manual_ids(ids: &HashMap<String, String>) -> ConfigResult<()> {
    for (handle, id) in ids {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::Validation(format!(
                "manual ID for '{}' must be numeric, got '{}'",
                handle, id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config {
            seeds: vec!["alice".to_string(), "42".to_string()],
            ..Config::default()
        };
        config.api.access_token = Some("token".to_string());
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_search_does_not_need_seeds() {
        let mut config = valid_config();
        config.seeds.clear();
        assert!(validate(&config).is_err());
        assert!(validate_for_search(&config).is_ok());
    }

    #[test]
    fn test_missing_credential() {
        let mut config = valid_config();
        config.api.access_token = None;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::MissingCredential)
        ));

        config.api.access_token = Some("   ".to_string());
        assert!(matches!(
            validate(&config),
            Err(ConfigError::MissingCredential)
        ));
    }

    #[test]
    fn test_validate_seeds() {
        assert!(validate_seeds(&["alice".to_string()]).is_ok());
        assert!(validate_seeds(&["@alice".to_string()]).is_ok());

        assert!(validate_seeds(&[]).is_err());
        assert!(validate_seeds(&["".to_string()]).is_err());
        assert!(validate_seeds(&["@".to_string()]).is_err());
        assert!(validate_seeds(&["two words".to_string()]).is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = valid_config();
        config.api.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = valid_config();
        config.limits.replies_page_size = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_cap_allowed() {
        let mut config = valid_config();
        config.limits.max_likes_per_post = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_manual_ids() {
        let mut ids = HashMap::new();
        ids.insert("alice".to_string(), "100".to_string());
        assert!(validate_manual_ids(&ids).is_ok());

        ids.insert("bob".to_string(), "abc".to_string());
        assert!(validate_manual_ids(&ids).is_err());
    }
}
