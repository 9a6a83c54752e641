//! Vacancy Sieve main entry point
//!
//! This is the command-line interface for the Vacancy Sieve crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use url::Url;
use vacancy_sieve::config::{load_config_with_hash, validate, Config};
use vacancy_sieve::crawler::crawl;
use vacancy_sieve::output::{print_records, print_statistics, ProgressBar};
use vacancy_sieve::url::listing_start_url;
use vacancy_sieve::FilterConfig;

/// Vacancy Sieve: a polite vacancy listing crawler
///
/// Vacancy Sieve walks the paginated vacancy listing, keeps the postings that
/// match your keywords and criteria, and prints them ordered by closing date.
#[derive(Parser, Debug)]
#[command(name = "vacancy-sieve")]
#[command(version)]
#[command(about = "A polite vacancy listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Only keep vacancies marked suitable for beginning teachers
    #[arg(long)]
    beginning_teacher: bool,

    /// Only keep permanent positions
    #[arg(long)]
    permanent: bool,

    /// Comma separated keywords, replacing the configured ones
    #[arg(short, long, value_name = "KEYWORDS")]
    keywords: Option<String>,

    /// First listing URL, replacing the one built from the listing settings
    #[arg(long, value_name = "URL")]
    start_url: Option<String>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e)
                        .with_context(|| format!("loading configuration {}", path.display()));
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid command-line override")?;

    let filter = config.filter.to_filter_config();
    let start_url = listing_start_url(&config.listing, filter.require_beginning_teacher_suitable())
        .context("building the first listing URL")?;

    if cli.dry_run {
        handle_dry_run(&config, &filter, &start_url);
        return Ok(());
    }

    handle_crawl(&config, filter, &start_url, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("vacancy_sieve=info,warn"),
            1 => EnvFilter::new("vacancy_sieve=debug,info"),
            2 => EnvFilter::new("vacancy_sieve=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Folds command-line flags into the loaded configuration
///
/// Flags only switch criteria on; `--keywords` replaces the configured list.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if cli.beginning_teacher {
        config.filter.beginning_teacher_only = true;
    }
    if cli.permanent {
        config.filter.permanent_only = true;
    }
    if let Some(keywords) = &cli.keywords {
        config.filter.keywords = vec![keywords.clone()];
    }
    if let Some(start_url) = &cli.start_url {
        config.listing.start_url = Some(start_url.clone());
    }
}

/// Handles the --dry-run mode: shows the resolved settings and first URL
fn handle_dry_run(config: &Config, filter: &FilterConfig, start_url: &Url) {
    println!("=== Vacancy Sieve Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Max retries: {}", config.crawler.max_retries);
    println!(
        "  Retry base delay: {}ms",
        config.crawler.retry_base_delay_ms
    );
    println!(
        "  Max concurrent details: {}",
        config.crawler.max_concurrent_details
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);

    println!("\nFilters:");
    println!(
        "  New Teacher only: {}",
        filter.require_beginning_teacher_suitable()
    );
    println!("  Permanent only:   {}", filter.require_permanent());
    println!("  Keywords:         {}", filter.keywords().join(", "));

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at {}", start_url);
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    filter: FilterConfig,
    start_url: &Url,
    quiet: bool,
) -> anyhow::Result<()> {
    tracing::info!(
        "Filters: beginning teacher only: {}, permanent only: {}, keywords: {:?}",
        filter.require_beginning_teacher_suitable(),
        filter.require_permanent(),
        filter.keywords()
    );

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing with the vacancies found so far");
            ctrl_c.cancel();
        }
    });

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new()
    };

    let result = crawl(config, filter, start_url, &progress, cancel).await;
    progress.finish();

    match result {
        Ok(outcome) => {
            tracing::info!("Crawl completed successfully");
            print_records(&outcome.records).context("writing results")?;
            if !quiet {
                print_statistics(&outcome);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e).context("crawl failed")
        }
    }
}
