//! Run statistics
//!
//! Counters kept by the crawler while it runs, and the end-of-run report.

use std::path::PathBuf;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Seeds taken from the configuration or command line
    pub seeds_total: u64,

    /// Seeds that could not be resolved to a user ID
    pub seeds_skipped: u64,

    /// Seeds whose posts were unreadable and fetched from `me` instead
    pub fallback_targets: u64,

    /// Reply or like fetches that failed and were recorded as empty
    pub leaf_failures: u64,

    pub users: u64,
    pub posts: u64,
    pub replies: u64,
    pub likes: u64,

    /// Run-scoped output directory
    pub output_dir: Option<PathBuf>,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows written across all four files
    pub fn total_records(&self) -> u64 {
        self.users + self.posts + self.replies + self.likes
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Seeds:");
    println!("  Total: {}", stats.seeds_total);
    println!("  Skipped (unresolved): {}", stats.seeds_skipped);
    println!("  Fallback to own posts: {}", stats.fallback_targets);
    println!();

    println!("Records:");
    println!("  users.csv: {}", stats.users);
    println!("  posts.csv: {}", stats.posts);
    println!("  replies.csv: {}", stats.replies);
    println!("  likes.csv: {}", stats.likes);
    if stats.leaf_failures > 0 {
        println!("  Reply/like fetches treated as empty: {}", stats.leaf_failures);
    }
    println!();

    if let Some(dir) = &stats.output_dir {
        println!("Output: {}", dir.display());
    }
}
