//! Seed handle to numeric user ID resolution
//!
//! Resolution order:
//! 1. The manual override table from the configuration
//! 2. Seeds that are already numeric
//! 3. Scraping the public profile page for an embedded user ID
//!
//! Failures are never errors here: a seed that cannot be resolved is
//! reported as `None` and skipped by the caller.

use crate::api::Transport;
use crate::config::Config;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded JSON fields carrying the user ID, in priority order
const EMBEDDED_ID_PATTERNS: [&str; 2] = [
    r#""user_id"\s*:\s*"(\d+)""#,
    r#""profile_id"\s*:\s*"(\d+)""#,
];

static EMBEDDED_ID_REGEXES: OnceLock<[Regex; 2]> = OnceLock::new();

fn embedded_id_regexes() -> &'static [Regex; 2] {
    EMBEDDED_ID_REGEXES.get_or_init(|| {
        EMBEDDED_ID_PATTERNS
            .map(|pattern| Regex::new(pattern).expect("embedded user ID pattern is valid"))
    })
}

/// Attribute carrying the user ID, checked after the embedded fields
const OPAQUE_ID_ATTRIBUTE: &str = "data-opaque-userid";

/// Where a resolved ID came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSource {
    Manual,
    Numeric,
    Profile,
}

/// A seed's numeric user ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedId {
    pub id: String,
    pub source: IdSource,
}

/// Maps seeds to numeric user IDs
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    manual_ids: HashMap<String, String>,
    profile_base_url: String,
}

impl IdentityResolver {
    pub fn new(config: &Config) -> Self {
        Self::with_overrides(config.manual_ids.clone(), &config.api.profile_base_url)
    }

    pub fn with_overrides(manual_ids: HashMap<String, String>, profile_base_url: &str) -> Self {
        Self {
            manual_ids,
            profile_base_url: profile_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolves a seed without touching the network (override table, numeric seed)
    pub fn resolve_offline(&self, seed: &str) -> Option<ResolvedId> {
        let seed = seed.trim();
        let handle = handle_of(seed);

        if let Some(id) = self
            .manual_ids
            .get(seed)
            .or_else(|| self.manual_ids.get(handle))
        {
            return Some(ResolvedId {
                id: id.clone(),
                source: IdSource::Manual,
            });
        }

        if !seed.is_empty() && seed.chars().all(|c| c.is_ascii_digit()) {
            return Some(ResolvedId {
                id: seed.to_string(),
                source: IdSource::Numeric,
            });
        }

        None
    }

    /// Resolves a seed, falling back to the profile page
    ///
    /// Issues at most one request, and only when the offline lookup misses.
    pub async fn resolve(&self, transport: &dyn Transport, seed: &str) -> Option<ResolvedId> {
        if let Some(resolved) = self.resolve_offline(seed) {
            return Some(resolved);
        }

        let url = self.profile_url(seed);
        tracing::info!("Resolving {} from profile page {}", seed, url);

        let response = match transport.get(&url, &[]).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Profile fetch for {} failed: {}", seed, e);
                return None;
            }
        };

        if response.status != 200 {
            tracing::warn!(
                "Profile fetch for {} returned HTTP {}",
                seed,
                response.status
            );
            return None;
        }

        extract_user_id(&response.body).map(|id| ResolvedId {
            id,
            source: IdSource::Profile,
        })
    }

    /// Public profile URL for a seed handle
    pub fn profile_url(&self, seed: &str) -> String {
        format!("{}/@{}", self.profile_base_url, handle_of(seed.trim()))
    }
}

fn handle_of(seed: &str) -> &str {
    seed.strip_prefix('@').unwrap_or(seed)
}

/// Finds the user ID embedded in a profile page
///
/// The embedded `user_id` field wins over `profile_id`, which wins over the
/// `data-opaque-userid` attribute.
pub fn extract_user_id(html: &str) -> Option<String> {
    for re in embedded_id_regexes() {
        if let Some(captures) = re.captures(html) {
            return Some(captures[1].to_string());
        }
    }

    extract_opaque_id(html)
}

/// Reads the first numeric `data-opaque-userid` attribute from the document
fn extract_opaque_id(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(&format!("[{}]", OPAQUE_ID_ATTRIBUTE)).ok()?;

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(OPAQUE_ID_ATTRIBUTE))
        .map(str::trim)
        .find(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}
