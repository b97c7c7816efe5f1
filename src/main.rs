//! wp-hunter main entry point
//!
//! This is the command-line interface for the wp-hunter crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wp_hunter::config::{self, load_config_with_hash, load_seed_file, Config};
use wp_hunter::output::{print_statistics, AppendFileSink};
use wp_hunter::Crawler;

/// wp-hunter: finds self-hosted WordPress sites
///
/// wp-hunter crawls outward from seed URLs, one polite request at a time
/// per host, and appends every site that fingerprints as WordPress to an
/// output file. Sites hosted on wordpress.com are never fetched.
#[derive(Parser, Debug)]
#[command(name = "wp-hunter")]
#[command(version = "1.0.0")]
#[command(about = "A polite crawler for self-hosted WordPress sites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL to start from (repeatable)
    #[arg(short, long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// File with one seed URL per line
    #[arg(long, value_name = "FILE")]
    seeds_file: Option<PathBuf>,

    /// File discoveries are appended to
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Override the maximum link depth
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if config.seeds.is_empty() {
        anyhow::bail!("no seed URLs given (use --seed, --seeds-file or `seeds` in the config)");
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wp_hunter=info,warn"),
            1 => EnvFilter::new("wp_hunter=debug,info"),
            2 => EnvFilter::new("wp_hunter=trace,debug"),
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

/// Loads the config file (if any) and layers the command-line options on top
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.output_path = output.clone();
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }

    config::validate(&config).context("invalid configuration")?;

    // Command-line and seed-file URLs are not validated here; the frontier
    // drops the bad ones with a warning
    config.seeds.extend(cli.seeds.iter().cloned());
    if let Some(path) = &cli.seeds_file {
        let seeds = load_seed_file(path)
            .with_context(|| format!("failed to read seeds from {}", path.display()))?;
        tracing::info!("Loaded {} seeds from {}", seeds.len(), path.display());
        config.seeds.extend(seeds);
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== wp-hunter Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!(
        "  Host pacing: {}",
        if config.crawler.strict_host_pacing {
            "strict"
        } else {
            "relaxed"
        }
    );
    println!("  Max pages per host: {}", config.crawler.max_pages_per_host);
    println!("  Excluded domain: {}", config.crawler.excluded_domain);
    if let Some(seconds) = config.crawler.max_run_seconds {
        println!("  Max run time: {}s", seconds);
    }

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout: {}s", config.fetcher.timeout_seconds);
    println!("  Body limit: {} chars", config.fetcher.body_limit);

    println!("\nOutput:");
    println!("  File: {}", config.output.output_path);

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let output_path = Path::new(&config.output.output_path);
    let sink = AppendFileSink::open(output_path, config.output.echo)
        .with_context(|| format!("failed to open {}", output_path.display()))?;

    tracing::info!("Appending discoveries to {}", output_path.display());

    let crawler = Crawler::new(&config, Box::new(sink))?;
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    match crawler.run_until(shutdown).await {
        Ok(stats) => {
            tracing::info!("Crawl completed");
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
