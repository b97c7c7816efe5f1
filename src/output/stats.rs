//! Crawl run statistics
//!
//! Counters collected by the crawl loop and a console report of them.

use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Seeds accepted into the frontier
    pub seeds: u64,

    /// Fetches handed to the fetcher
    pub dispatched: u64,

    /// Fetches that returned a page
    pub fetched: u64,

    /// Fetches that failed (network, timeout, refused redirect)
    pub failed: u64,

    /// URLs skipped because they belong to the hosted platform
    pub excluded: u64,

    /// Tasks dropped for exceeding the depth bound
    pub skipped_depth: u64,

    /// Tasks dropped because the URL was already visited
    pub skipped_visited: u64,

    /// Pages whose links were not followed because their host hit the cap
    pub host_cap_reached: u64,

    /// Links added to the frontier
    pub links_enqueued: u64,

    /// Discoveries handed to the sink
    pub discoveries: u64,

    /// Dispatching stopped early (shutdown signal or deadline)
    pub interrupted: bool,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            seeds: 0,
            dispatched: 0,
            fetched: 0,
            failed: 0,
            excluded: 0,
            skipped_depth: 0,
            skipped_visited: 0,
            host_cap_reached: 0,
            links_enqueued: 0,
            discoveries: 0,
            interrupted: false,
        }
    }

    /// Marks the run as finished now
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Returns the fetch success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let completed = self.fetched + self.failed;
        if completed == 0 {
            return 0.0;
        }
        (self.fetched as f64 / completed as f64) * 100.0
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints statistics to the console in a human-readable format
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Started:  {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = stats.duration_seconds() {
        println!("Duration: {}s", seconds);
    }
    if stats.interrupted {
        println!("Status:   interrupted (in-flight fetches drained)");
    }

    println!("\nFrontier:");
    println!("  Seeds:             {}", stats.seeds);
    println!("  Links enqueued:    {}", stats.links_enqueued);
    println!("  Skipped (visited): {}", stats.skipped_visited);
    println!("  Skipped (depth):   {}", stats.skipped_depth);
    println!("  Excluded (hosted): {}", stats.excluded);
    println!("  Host cap reached:  {}", stats.host_cap_reached);

    println!("\nFetches:");
    println!("  Dispatched: {}", stats.dispatched);
    println!("  Fetched:    {}", stats.fetched);
    println!("  Failed:     {}", stats.failed);
    println!("  Success:    {:.1}%", stats.success_rate());

    println!("\nDiscoveries: {}", stats.discoveries);
}
