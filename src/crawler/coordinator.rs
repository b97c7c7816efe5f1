//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the pieces together:
//! - Popping tasks off the frontier and admitting them
//! - Spawning paced fetches, never more than the concurrency limit at once
//! - Fingerprinting fetched pages and reporting discoveries
//! - Following same-host links until the host cap is reached
//! - Draining in-flight work on shutdown or deadline

use crate::config::{validate_settings, Config, CrawlerConfig};
use crate::crawler::fetcher::{build_http_client, FetchedPage, Fetcher};
use crate::crawler::parser::extract_same_host_links;
use crate::crawler::scheduler::{Admission, CrawlTask, Frontier};
use crate::fingerprint::Fingerprinter;
use crate::output::{CrawlStats, Discovery, DiscoverySink};
use crate::state::RateLimiter;
use crate::url::host_key;
use crate::HunterError;
use std::future::{pending, Future};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// A fetch that has finished, with the page classified
struct Completed {
    task: CrawlTask,
    url: Url,
    host: String,
    page: Option<ClassifiedPage>,
}

struct ClassifiedPage {
    page: FetchedPage,
    evidence: Option<String>,
    /// Same-host links, extracted only when the task may still descend
    links: Vec<Url>,
}

/// One crawl session
///
/// Owns the frontier, the discovery sink and the run statistics. The
/// frontier is only touched by the loop in [`Crawler::run_until`]; fetch
/// tasks get a clone of the fetcher and the shared fingerprinter.
pub struct Crawler {
    config: CrawlerConfig,
    frontier: Frontier,
    fetcher: Fetcher,
    fingerprinter: Arc<Fingerprinter>,
    sink: Box<dyn DiscoverySink>,
    stats: CrawlStats,
}

impl Crawler {
    /// Creates a crawl session and seeds it with `config.seeds`
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `sink` - Where discoveries are written
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(HunterError)` - Invalid settings, or the HTTP client or
    ///   fingerprint rules failed to build
    ///
    /// Seeds are not validated here; invalid ones are dropped with a warning.
    pub fn new(config: &Config, sink: Box<dyn DiscoverySink>) -> Result<Self, HunterError> {
        validate_settings(config)?;
        let crawler_config = config.crawler.clone();

        let client = build_http_client(&config.fetcher, &crawler_config.excluded_domain)?;
        let delay = Duration::from_millis(crawler_config.request_delay_ms);
        let limiter = if crawler_config.strict_host_pacing {
            RateLimiter::strict(delay)
        } else {
            RateLimiter::new(delay)
        };
        let admission = Semaphore::new(crawler_config.max_concurrent_requests as usize);
        let fetcher = Fetcher::new(
            client,
            Arc::new(limiter),
            Arc::new(admission),
            config.fetcher.body_limit,
        );

        let mut crawler = Self {
            frontier: Frontier::new(&crawler_config),
            config: crawler_config,
            fetcher,
            fingerprinter: Arc::new(Fingerprinter::wordpress()?),
            sink,
            stats: CrawlStats::new(),
        };
        crawler.seed(&config.seeds);

        Ok(crawler)
    }

    /// Adds seed URLs at depth 0; invalid seeds are logged and dropped
    pub fn seed<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let accepted = self.frontier.seed(urls);
        self.stats.seeds += accepted as u64;
        accepted
    }

    /// Number of tasks waiting in the frontier
    pub fn pending(&self) -> usize {
        self.frontier.len()
    }

    /// Runs until the frontier is exhausted
    pub async fn run(self) -> Result<CrawlStats, HunterError> {
        self.run_until(pending::<()>()).await
    }

    /// Runs until the frontier is exhausted or `shutdown` resolves
    ///
    /// # Termination
    ///
    /// The loop ends when the queue is empty and no fetch is outstanding.
    /// At most `max-concurrent-requests` fetches are outstanding at once.
    ///
    /// When `shutdown` resolves (or `max-run-seconds` elapses) dispatching
    /// stops and the fetcher is cancelled: outstanding fetches that have not
    /// sent their request yet give up, requests already on the wire are
    /// drained and still classified, and no links are enqueued.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<CrawlStats, HunterError>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(
            "Starting crawl with {} seeds (max depth {}, {} concurrent)",
            self.frontier.len(),
            self.config.max_depth,
            self.config.max_concurrent_requests
        );

        let max_run = self.config.max_run_seconds.map(Duration::from_secs);
        let stop = async move {
            let deadline = async {
                match max_run {
                    Some(limit) => tokio::time::sleep(limit).await,
                    None => pending::<()>().await,
                }
            };
            tokio::select! {
                _ = shutdown => "shutdown requested",
                _ = deadline => "run time limit reached",
            }
        };
        tokio::pin!(stop);

        let mut in_flight: JoinSet<Completed> = JoinSet::new();
        let max_in_flight = self.config.max_concurrent_requests as usize;
        let mut draining = false;

        loop {
            if !draining {
                while in_flight.len() < max_in_flight {
                    let Some(task) = self.frontier.pop() else {
                        break;
                    };
                    self.dispatch(task, &mut in_flight);
                }
            }

            if in_flight.is_empty() {
                break;
            }

            tokio::select! {
                joined = in_flight.join_next() => match joined {
                    Some(Ok(completed)) => self.handle_completion(completed, draining),
                    Some(Err(e)) => {
                        self.stats.failed += 1;
                        tracing::warn!("Fetch task ended abnormally: {}", e);
                    }
                    None => {}
                },
                reason = &mut stop, if !draining => {
                    tracing::info!(
                        "{}; draining {} in-flight fetches, {} queued URLs abandoned",
                        reason,
                        in_flight.len(),
                        self.frontier.len()
                    );
                    draining = true;
                    self.stats.interrupted = true;
                    self.fetcher.cancel();
                }
            }
        }

        if let Err(e) = self.sink.finalize() {
            tracing::error!("Failed to finalize output: {}", e);
        }

        self.stats.finish();
        tracing::info!(
            "Crawl finished: {} fetched, {} failed, {} discoveries",
            self.stats.fetched,
            self.stats.failed,
            self.stats.discoveries
        );

        Ok(self.stats)
    }

    /// Admits a task and spawns its fetch
    fn dispatch(&mut self, task: CrawlTask, in_flight: &mut JoinSet<Completed>) {
        let (url, host) = match self.frontier.admit(&task) {
            Admission::Dispatch { url, host } => (url, host),
            Admission::TooDeep => {
                self.stats.skipped_depth += 1;
                return;
            }
            Admission::AlreadyVisited => {
                self.stats.skipped_visited += 1;
                return;
            }
            Admission::Excluded => {
                tracing::debug!("Skipping hosted platform URL {}", task.url);
                self.stats.excluded += 1;
                return;
            }
            Admission::Invalid => {
                tracing::debug!("Skipping uncrawlable URL {}", task.url);
                return;
            }
        };

        tracing::debug!("Crawling {} (depth {})", url, task.depth);
        self.stats.dispatched += 1;

        let fetcher = self.fetcher.clone();
        let fingerprinter = Arc::clone(&self.fingerprinter);
        let descend = self.frontier.can_descend(task.depth);
        in_flight.spawn(async move {
            let page = fetcher.fetch(&url).await.into_page().map(|page| {
                let evidence = fingerprinter
                    .classify(page.final_url.as_str(), Some(&page.body), Some(&page.headers))
                    .map(str::to_string);
                // Relative links resolve against the requested URL, not the post-redirect one
                let links = if descend {
                    extract_same_host_links(&page.body, &url)
                } else {
                    Vec::new()
                };
                ClassifiedPage {
                    page,
                    evidence,
                    links,
                }
            });
            Completed {
                task,
                url,
                host,
                page,
            }
        });
    }

    /// Reports a discovery and follows links for a finished fetch
    fn handle_completion(&mut self, completed: Completed, draining: bool) {
        let Completed {
            task,
            url,
            host,
            page,
        } = completed;

        let Some(ClassifiedPage {
            page,
            evidence,
            links,
        }) = page
        else {
            self.stats.failed += 1;
            return;
        };
        self.stats.fetched += 1;

        if let Some(evidence) = evidence {
            self.report(&page, evidence);
        }

        if draining {
            return;
        }

        if self.frontier.host_cap_reached(&host) {
            tracing::debug!(
                "Host {} reached {} pages; not following links from {}",
                host,
                self.config.max_pages_per_host,
                url
            );
            self.stats.host_cap_reached += 1;
            return;
        }

        let added = self.frontier.enqueue_links(links, task.depth);
        self.stats.links_enqueued += added as u64;
    }

    fn report(&mut self, page: &FetchedPage, evidence: String) {
        let final_url = page.final_url.as_str();
        if !self.frontier.record_discovery(final_url) {
            return;
        }

        let discovery = Discovery {
            host: host_key(&page.final_url).unwrap_or_default(),
            evidence,
            final_url: final_url.to_string(),
        };
        tracing::info!("Found WordPress site: {}", discovery);
        self.stats.discoveries += 1;

        if let Err(e) = self.sink.record(&discovery) {
            tracing::error!("Failed to record {}: {}", discovery.final_url, e);
        }
    }
}

/// Runs a complete crawl until the frontier is exhausted
///
/// Discoveries are appended to `config.output.output_path`.
pub async fn run_crawl(config: Config) -> Result<CrawlStats, HunterError> {
    validate_settings(&config)?;
    let sink = crate::output::AppendFileSink::open(
        std::path::Path::new(&config.output.output_path),
        config.output.echo,
    )?;
    Crawler::new(&config, Box::new(sink))?.run().await
}
