//! Crawl coordinator - seed-by-seed orchestration
//!
//! Each seed goes through:
//! - Resolution to a numeric user ID (unresolved seeds are skipped)
//! - Profile lookup and the users.csv row
//! - A permission probe deciding whose posts are fetched
//! - Capped post fetch, then per post a capped reply and like fetch
//!
//! Reply and like failures only empty that post's rows. Any other failure
//! aborts the run after flushing what has been written so far.

use crate::api::{ApiClient, ReqwestTransport, Transport};
use crate::config::Config;
use crate::crawler::fetchers::{fetch_likes, fetch_posts, fetch_profile, fetch_replies};
use crate::crawler::prober::can_read_threads;
use crate::crawler::resolver::IdentityResolver;
use crate::model::{Identity, Post};
use crate::output::{CrawlStatistics, OutputSet};
use crate::Result;
use std::path::Path;
use std::sync::Arc;

/// Post target used when a user's own posts are not readable
pub const FALLBACK_TARGET: &str = "me";

/// Main crawler coordinator structure
pub struct Crawler {
    config: Arc<Config>,
    client: ApiClient,
    resolver: IdentityResolver,
    output: OutputSet,
    stats: CrawlStatistics,
}

impl Crawler {
    /// Creates a crawler with the HTTP transport and a fresh run directory
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run; the output directory already exists
    /// * `Err(CrawlerError)` - The HTTP client or output files could not be created
    pub fn new(config: Config) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::from_config(&config.api)?);
        let output = OutputSet::create(Path::new(&config.output.directory))?;
        Ok(Self::with_transport(config, transport, output))
    }

    /// Creates a crawler over any transport, writing into `output`
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>, output: OutputSet) -> Self {
        let client = ApiClient::new(transport, &config);
        let resolver = IdentityResolver::new(&config);

        Self {
            config: Arc::new(config),
            client,
            resolver,
            output,
            stats: CrawlStatistics::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        self.output.dir()
    }

    /// Runs every seed in order and closes the output files
    ///
    /// Returns the per-entity record counts. On an unrecoverable error the
    /// files are flushed and closed before the error is returned, so rows
    /// for every completed post remain on disk.
    pub async fn run(mut self) -> Result<CrawlStatistics> {
        let seeds = self.config.seeds.clone();
        self.stats.seeds_total = seeds.len() as u64;
        tracing::info!(
            "Starting crawl of {} seeds into {}",
            seeds.len(),
            self.output.dir().display()
        );

        for seed in &seeds {
            if let Err(e) = self.process_seed(seed).await {
                tracing::error!(
                    "Aborting run at seed {}: {} (partial output in {})",
                    seed,
                    e,
                    self.output.dir().display()
                );
                if let Err(flush_err) = self.output.flush_all() {
                    tracing::error!("Flushing output after abort failed: {}", flush_err);
                }
                let mut stats = self.stats;
                if let Err(close_err) = self.output.close(&mut stats) {
                    tracing::error!("Closing output after abort failed: {}", close_err);
                }
                return Err(e);
            }
        }

        let mut stats = self.stats;
        self.output.close(&mut stats)?;

        tracing::info!(
            "Crawl completed: {} users, {} posts, {} replies, {} likes",
            stats.users,
            stats.posts,
            stats.replies,
            stats.likes
        );
        Ok(stats)
    }

    /// Processes a single seed
    async fn process_seed(&mut self, seed: &str) -> Result<()> {
        let Some(resolved) = self.resolver.resolve(self.client.transport(), seed).await else {
            tracing::warn!("Could not resolve {}, skipping", seed);
            self.stats.seeds_skipped += 1;
            return Ok(());
        };
        let user_id = resolved.id;
        tracing::debug!("Resolved {} -> {} ({:?})", seed, user_id, resolved.source);

        let identity = match fetch_profile(&self.client, &user_id).await {
            Ok(profile) => Identity::from_profile(&profile, &user_id, seed),
            Err(e) => {
                tracing::debug!("Profile lookup for {} failed: {}", user_id, e);
                Identity::unprofiled(&user_id, seed)
            }
        };
        self.output.users.write(&identity)?;
        self.output.users.flush()?;
        tracing::info!("User {} ({})", identity.username, user_id);

        let (target, fallback_author) = if can_read_threads(&self.client, &user_id).await? {
            (user_id.as_str(), Some(user_id.as_str()))
        } else {
            tracing::warn!(
                "No permission to read posts of {} ({}), falling back to /{}",
                seed,
                user_id,
                FALLBACK_TARGET
            );
            self.stats.fallback_targets += 1;
            (FALLBACK_TARGET, None)
        };

        let limits = &self.config.limits;
        let posts = fetch_posts(
            &self.client,
            target,
            limits.max_threads_per_user,
            limits.posts_page_size,
            fallback_author,
        )
        .await?;
        tracing::info!("Posts for {}: {}", seed, posts.len());

        for post in &posts {
            self.process_post(post).await?;
        }

        Ok(())
    }

    /// Writes one post and its replies and likes
    async fn process_post(&mut self, post: &Post) -> Result<()> {
        self.output.posts.write(post)?;
        self.output.posts.flush()?;

        if post.id.is_empty() {
            tracing::warn!("Post without id, skipping replies and likes");
            return Ok(());
        }

        let limits = self.config.limits.clone();

        let replies = match fetch_replies(
            &self.client,
            &post.id,
            limits.max_replies_per_post,
            limits.replies_page_size,
        )
        .await
        {
            Ok(replies) => replies,
            Err(e) => {
                tracing::warn!("Replies for post {} unavailable, recording none: {}", post.id, e);
                self.stats.leaf_failures += 1;
                Vec::new()
            }
        };
        for reply in &replies {
            self.output.replies.write(reply)?;
        }
        self.output.replies.flush()?;

        let likes = match fetch_likes(
            &self.client,
            &post.id,
            limits.max_likes_per_post,
            limits.likes_page_size,
        )
        .await
        {
            Ok(likes) => likes,
            Err(e) => {
                tracing::warn!("Likes for post {} unavailable, recording none: {}", post.id, e);
                self.stats.leaf_failures += 1;
                Vec::new()
            }
        };
        for like in &likes {
            self.output.likes.write(like)?;
        }
        self.output.likes.flush()?;

        tracing::debug!(
            "Post {}: {} replies, {} likes",
            post.id,
            replies.len(),
            likes.len()
        );

        self.client.pace().await;
        Ok(())
    }
}

/// Runs a complete crawl with the HTTP transport
///
/// # Example
///
/// ```no_run
/// use threads_crawler::config::load_config;
/// use threads_crawler::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawler.toml"))?;
/// let stats = run_crawl(config).await?;
/// println!("{} posts", stats.posts);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlStatistics> {
    Crawler::new(config)?.run().await
}
