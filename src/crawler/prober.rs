//! Read-permission probe for a user's posts

use crate::api::{params, ApiClient};
use crate::{CrawlerError, Result};

/// Graph API error code reported for unreadable (private/restricted) users
pub const PERMISSION_DENIED_CODE: i64 = 100;

/// Graph API error subcode paired with `PERMISSION_DENIED_CODE`
pub const PERMISSION_DENIED_SUBCODE: i64 = 33;

/// Checks whether the token may read `user_id`'s posts
///
/// Requests a single-item page. Returns `Ok(false)` only for the
/// permission-denied code/subcode pair; every other failure is returned as
/// `Err` for the caller to handle.
pub async fn can_read_threads(client: &ApiClient, user_id: &str) -> Result<bool> {
    let path = format!("/{}/threads", user_id);
    match client.get(&path, &params(&[("fields", "id"), ("limit", "1")])).await {
        Ok(_) => Ok(true),
        Err(e) if is_permission_denied(&e) => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn is_permission_denied(err: &CrawlerError) -> bool {
    err.api_codes()
        == Some((
            Some(PERMISSION_DENIED_CODE),
            Some(PERMISSION_DENIED_SUBCODE),
        ))
}
