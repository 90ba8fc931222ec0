//! Crawler module for seed-based collection
//!
//! This module contains the core crawling logic, including:
//! - Resolving seed handles to numeric user IDs
//! - Probing read permission on a user's posts
//! - Capped fetchers for posts, replies and likes
//! - Overall crawl coordination

mod coordinator;
mod fetchers;
mod prober;
mod resolver;

pub use coordinator::{run_crawl, Crawler, FALLBACK_TARGET};
pub use fetchers::{
    fetch_likes, fetch_posts, fetch_profile, fetch_replies, LIKE_FIELDS, POST_FIELDS,
    REPLY_FIELDS, USER_FIELDS,
};
pub use prober::{
    can_read_threads, is_permission_denied, PERMISSION_DENIED_CODE, PERMISSION_DENIED_SUBCODE,
};
pub use resolver::{extract_user_id, IdSource, IdentityResolver, ResolvedId};
