//! Normalized records written by the crawler
//!
//! Each type maps one upstream JSON object onto the fixed columns of its CSV
//! file. Serialized field names are the column names.

use serde::Serialize;
use serde_json::Value;

/// A resolved user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    #[serde(rename = "user_id")]
    pub id: String,
    pub username: String,
    /// `None` when the profile lookup did not report it
    pub verified: Option<bool>,
}

impl Identity {
    /// Builds an identity from a `/{id}?fields=id,username,verified` response
    ///
    /// Missing values fall back to the resolved ID and the seed handle.
    pub fn from_profile(profile: &Value, id: &str, seed: &str) -> Self {
        Self {
            id: str_field(profile, "id").unwrap_or_else(|| id.to_string()),
            username: str_field(profile, "username").unwrap_or_else(|| seed.to_string()),
            verified: profile.get("verified").and_then(Value::as_bool),
        }
    }

    /// Identity used when the profile could not be fetched
    pub fn unprofiled(id: &str, seed: &str) -> Self {
        Self {
            id: id.to_string(),
            username: seed.to_string(),
            verified: None,
        }
    }
}

/// A top-level post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    #[serde(rename = "post_id")]
    pub id: String,
    pub author_id: Option<String>,
    pub created_time: Option<String>,
    pub permalink: Option<String>,
    pub media_type: Option<String>,
    pub like_count: Option<u64>,
    pub reply_count: Option<u64>,
    pub text: String,
}

impl Post {
    /// Normalizes a post object
    ///
    /// `text` falls back to `caption`. `fallback_author` is used when the
    /// payload carries no author.
    pub fn from_api(item: &Value, fallback_author: Option<&str>) -> Self {
        let text = str_field(item, "text")
            .filter(|t| !t.is_empty())
            .or_else(|| str_field(item, "caption"))
            .unwrap_or_default();

        Self {
            id: str_field(item, "id").unwrap_or_default(),
            author_id: author_id(item).or_else(|| fallback_author.map(str::to_string)),
            created_time: str_field(item, "created_time"),
            permalink: str_field(item, "permalink"),
            media_type: str_field(item, "media_type"),
            like_count: count_field(item, "like_count"),
            reply_count: count_field(item, "reply_count"),
            text: collapse_line_breaks(&text),
        }
    }
}

/// A reply to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub post_id: String,
    #[serde(rename = "reply_id")]
    pub id: String,
    pub author_id: Option<String>,
    pub created_time: Option<String>,
    pub permalink: Option<String>,
    pub like_count: Option<u64>,
    pub reply_count: Option<u64>,
    pub text: String,
}

impl Reply {
    /// Normalizes a reply object; `post_id` is not part of the payload
    pub fn from_api(post_id: &str, item: &Value) -> Self {
        Self {
            post_id: post_id.to_string(),
            id: str_field(item, "id").unwrap_or_default(),
            author_id: author_id(item),
            created_time: str_field(item, "created_time"),
            permalink: str_field(item, "permalink"),
            like_count: count_field(item, "like_count"),
            reply_count: count_field(item, "reply_count"),
            text: collapse_line_breaks(&str_field(item, "text").unwrap_or_default()),
        }
    }
}

/// A like on a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Like {
    pub post_id: String,
    pub user_id: Option<String>,
    pub username: Option<String>,
}

impl Like {
    pub fn from_api(post_id: &str, item: &Value) -> Self {
        Self {
            post_id: post_id.to_string(),
            user_id: str_field(item, "id"),
            username: str_field(item, "username"),
        }
    }
}

/// Replaces embedded line breaks with single spaces
pub fn collapse_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Reads a string field; numeric IDs are accepted and stringified
fn str_field(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn count_field(item: &Value, key: &str) -> Option<u64> {
    match item.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// `author.id`, or `author` itself when the API returns a bare ID
fn author_id(item: &Value) -> Option<String> {
    match item.get("author")? {
        author @ Value::Object(_) => str_field(author, "id"),
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
