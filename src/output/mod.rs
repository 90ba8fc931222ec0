//! Output module for crawl results
//!
//! This module handles:
//! - Creating a fresh, timestamped directory per run
//! - Writing users, posts, replies and likes as fixed-column CSV files
//! - Recording and printing run statistics

mod sink;
pub mod stats;

pub use sink::TabularSink;
pub use stats::{print_statistics, CrawlStatistics};

use crate::Result;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const USER_COLUMNS: &[&str] = &["user_id", "username", "verified"];

pub const POST_COLUMNS: &[&str] = &[
    "post_id",
    "author_id",
    "created_time",
    "permalink",
    "media_type",
    "like_count",
    "reply_count",
    "text",
];

pub const REPLY_COLUMNS: &[&str] = &[
    "post_id",
    "reply_id",
    "author_id",
    "created_time",
    "permalink",
    "like_count",
    "reply_count",
    "text",
];

pub const LIKE_COLUMNS: &[&str] = &["post_id", "user_id", "username"];

/// The four CSV destinations of one crawl run
pub struct OutputSet {
    dir: PathBuf,
    pub users: TabularSink,
    pub posts: TabularSink,
    pub replies: TabularSink,
    pub likes: TabularSink,
}

impl OutputSet {
    /// Creates a new run directory under `parent` and opens all four files
    pub fn create(parent: &Path) -> Result<Self> {
        let dir = create_run_dir(parent)?;
        Self::open_in(&dir)
    }

    /// Opens all four files inside an existing directory
    pub fn open_in(dir: &Path) -> Result<Self> {
        Ok(Self {
            dir: dir.to_path_buf(),
            users: TabularSink::create(&dir.join("users.csv"), USER_COLUMNS)?,
            posts: TabularSink::create(&dir.join("posts.csv"), POST_COLUMNS)?,
            replies: TabularSink::create(&dir.join("replies.csv"), REPLY_COLUMNS)?,
            likes: TabularSink::create(&dir.join("likes.csv"), LIKE_COLUMNS)?,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn flush_all(&mut self) -> Result<()> {
        self.users.flush()?;
        self.posts.flush()?;
        self.replies.flush()?;
        self.likes.flush()?;
        Ok(())
    }

    /// Closes every file and copies the row counts into `stats`
    pub fn close(self, stats: &mut CrawlStatistics) -> Result<()> {
        stats.output_dir = Some(self.dir);
        stats.users = self.users.close()?;
        stats.posts = self.posts.close()?;
        stats.replies = self.replies.close()?;
        stats.likes = self.likes.close()?;
        Ok(())
    }
}

/// Creates `parent/<UTC %Y%m%d_%H%M%S>`, adding `_1`, `_2`, ... if it already exists
pub fn create_run_dir(parent: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(parent)?;
    let stamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();

    let mut attempt = 0u32;
    loop {
        let name = if attempt == 0 {
            stamp.clone()
        } else {
            format!("{}_{}", stamp, attempt)
        };
        let dir = parent.join(name);

        match std::fs::create_dir(&dir) {
            Ok(()) => return Ok(dir),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}
