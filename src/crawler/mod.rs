//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Paced HTTP fetching with a bounded body read
//! - HTML link extraction
//! - The breadth-first frontier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use crate::output::CrawlStats;
pub use coordinator::{run_crawl, Crawler};
pub use fetcher::{
    build_http_client, truncate_chars, FetchError, FetchOutcome, FetchedPage, Fetcher,
    MAX_REDIRECTS,
};
pub use parser::{extract_links, extract_same_host_links};
pub use scheduler::{Admission, CrawlTask, Frontier};

use crate::config::Config;
use crate::HunterError;

/// Runs a complete crawl operation
///
/// This is the main entry point for a one-shot crawl. It will:
/// 1. Open the output file for appending
/// 2. Build the HTTP client, rate limiter and fingerprint rules
/// 3. Seed the frontier from `config.seeds`
/// 4. Fetch, classify and follow links until the frontier is exhausted
///
/// # Returns
///
/// * `Ok(CrawlStats)` - Crawl completed
/// * `Err(HunterError)` - Setup failed
pub async fn crawl(config: Config) -> Result<CrawlStats, HunterError> {
    run_crawl(config).await
}
