//! threads-crawler main entry point
//!
//! This is the command-line interface for the seed-based Threads crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use threads_crawler::api::{ApiClient, ReqwestTransport};
use threads_crawler::config::{
    apply_env_token, parse_config_file, validate, validate_for_search, Config,
};
use threads_crawler::crawler::{run_crawl, IdSource, IdentityResolver, ResolvedId};
use threads_crawler::output::print_statistics;
use threads_crawler::search::{run_search, SearchQuery};
use tracing_subscriber::EnvFilter;

/// threads-crawler: collect posts, replies and likes starting from seed users
///
/// Seeds are resolved to numeric user IDs, their posts are fetched through
/// the Graph API, and everything is written as CSV files into a fresh
/// timestamped directory. The access token is read from THREADS_ACCESS_TOKEN
/// (a .env file is honoured) or from the configuration file.
#[derive(Parser, Debug)]
#[command(name = "threads-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Seed-based Threads crawler", long_about = None)]
struct Cli {
    /// Seed handles or numeric user IDs; replace the seeds from the config file
    #[arg(value_name = "SEED")]
    seeds: Vec<String>,

    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without any network access
    #[arg(long, conflicts_with = "search")]
    dry_run: bool,

    /// Run a keyword search instead of the seed crawl
    #[arg(long, value_name = "KEYWORD")]
    search: Option<String>,

    /// Only match posts after this time (ISO 8601 or unix timestamp)
    #[arg(long, requires = "search")]
    since: Option<String>,

    /// Only match posts before this time (ISO 8601 or unix timestamp)
    #[arg(long, requires = "search")]
    until: Option<String>,

    /// Maximum number of search result pages, 0 follows every page [default: 1]
    #[arg(long, requires = "search")]
    max_pages: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {:#}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if let Some(keyword) = &cli.search {
        handle_search(&config, &cli, keyword).await?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("threads_crawler=info,warn"),
            1 => EnvFilter::new("threads_crawler=debug,info"),
            2 => EnvFilter::new("threads_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (or defaults), layers env and CLI seeds, and validates
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            parse_config_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };

    apply_env_token(&mut config);
    if !cli.seeds.is_empty() {
        config.seeds = cli.seeds.clone();
    }

    if cli.search.is_some() {
        validate_for_search(&config)?;
    } else {
        validate(&config)?;
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== threads-crawler Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Profile pages: {}", config.api.profile_base_url);
    println!("  Timeout: {}s", config.api.timeout_seconds);
    println!("  Access token: {}", mask_token(config.access_token()));

    println!("\nLimits:");
    println!("  Posts per user: {}", config.limits.max_threads_per_user);
    println!("  Replies per post: {}", config.limits.max_replies_per_post);
    println!("  Likes per post: {}", config.limits.max_likes_per_post);
    println!("  Pacing: {}ms", config.limits.pace_ms);

    println!("\nOutput:");
    println!("  Directory: {}/<timestamp>", config.output.directory);

    println!("\nSeeds ({}):", config.seeds.len());
    let resolver = IdentityResolver::new(config);
    for seed in &config.seeds {
        println!("  - {}", seed_line(&resolver, seed));
    }

    println!("\n✓ Configuration is valid");
}

/// Handles --search: keyword search written to search.csv
async fn handle_search(config: &Config, cli: &Cli, keyword: &str) -> anyhow::Result<()> {
    let transport = Arc::new(ReqwestTransport::from_config(&config.api)?);
    let client = ApiClient::new(transport, config);

    let query = SearchQuery {
        keyword: keyword.to_string(),
        since: cli.since.clone(),
        until: cli.until.clone(),
        page_size: config.limits.posts_page_size,
        max_pages: match cli.max_pages.unwrap_or(1) {
            0 => None,
            n => Some(n),
        },
    };

    tracing::info!("Searching keyword: {:?}", keyword);
    let (path, posts) = run_search(&client, &query, Path::new(&config.output.directory)).await?;
    tracing::info!("Saved {} posts to {}", posts.len(), path.display());
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Seeds: {}, manual IDs: {}",
        config.seeds.len(),
        config.manual_ids.len()
    );

    match run_crawl(config).await {
        Ok(stats) => {
            print_statistics(&stats);
            if let Some(dir) = &stats.output_dir {
                tracing::info!("Done. Data in {}", dir.display());
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Describes how a seed will be resolved, without network access
fn seed_line(resolver: &IdentityResolver, seed: &str) -> String {
    match resolver.resolve_offline(seed) {
        Some(ResolvedId {
            id,
            source: IdSource::Manual,
        }) => format!("{} -> {} (manual)", seed, id),
        Some(ResolvedId { id, .. }) => format!("{} -> {}", seed, id),
        None => format!("{} (profile lookup)", seed),
    }
}

fn mask_token(token: &str) -> String {
    let tail: String = token
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{}", tail)
}
