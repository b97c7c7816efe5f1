//! Crawl frontier
//!
//! This module handles:
//! - The FIFO queue of pending tasks (breadth-first order)
//! - The visited set, keyed on the exact URL string as enqueued
//! - Per-host visited-page counts used to cap fan-out
//! - Deduplication of discoveries by final URL
//!
//! Every method is synchronous. The crawl loop owns the frontier and calls
//! it between suspension points, so each check-then-insert is atomic with
//! respect to concurrent fetches.

use crate::config::CrawlerConfig;
use crate::url::{host_key, is_platform_hosted, parse_crawl_url};
use std::collections::{HashMap, HashSet, VecDeque};
use url::Url;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// The URL exactly as discovered
    pub url: String,

    /// Link distance from the seed (seeds are depth 0)
    pub depth: u32,
}

impl CrawlTask {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Decision taken for a popped task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Fetch it; the URL is now marked visited and counted against its host
    Dispatch { url: Url, host: String },

    /// Deeper than the depth bound
    TooDeep,

    /// Already dispatched (or rejected) earlier
    AlreadyVisited,

    /// Served by the hosted platform; marked visited, never fetched
    Excluded,

    /// Not a crawlable http(s) URL; marked visited, never fetched
    Invalid,
}

/// Frontier state for one crawl session
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<CrawlTask>,
    visited: HashSet<String>,
    host_pages: HashMap<String, usize>,
    reported: HashSet<String>,
    max_depth: u32,
    max_pages_per_host: usize,
    excluded_domain: String,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            host_pages: HashMap::new(),
            reported: HashSet::new(),
            max_depth: config.max_depth,
            max_pages_per_host: config.max_pages_per_host as usize,
            excluded_domain: config.excluded_domain.clone(),
        }
    }

    /// Enqueues seed URLs at depth 0
    ///
    /// Seeds that are not absolute http(s) URLs are logged and dropped.
    /// Returns the number of seeds accepted.
    pub fn seed<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut accepted = 0;
        for seed in urls {
            let seed = seed.as_ref().trim();
            match parse_crawl_url(seed) {
                Ok(_) => {
                    self.queue.push_back(CrawlTask::new(seed, 0));
                    accepted += 1;
                }
                Err(e) => tracing::warn!("Ignoring seed {:?}: {}", seed, e),
            }
        }
        accepted
    }

    /// Appends a task to the back of the queue
    pub fn push(&mut self, task: CrawlTask) {
        self.queue.push_back(task);
    }

    /// Removes the task at the head of the queue
    pub fn pop(&mut self) -> Option<CrawlTask> {
        self.queue.pop_front()
    }

    /// Number of queued tasks
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of visited, non-excluded URLs on `host`
    pub fn host_page_count(&self, host: &str) -> usize {
        self.host_pages.get(host).copied().unwrap_or(0)
    }

    /// True once `host` has reached the per-host page cap
    pub fn host_cap_reached(&self, host: &str) -> bool {
        self.host_page_count(host) >= self.max_pages_per_host
    }

    /// True if links found at `depth` may still be enqueued
    pub fn can_descend(&self, depth: u32) -> bool {
        depth < self.max_depth
    }

    /// Decides whether a popped task gets fetched
    ///
    /// # Admission Rules
    ///
    /// | Condition | Result | Marked visited | Counted for host |
    /// |-----------|--------|----------------|------------------|
    /// | depth > max depth | `TooDeep` | no | no |
    /// | URL already visited | `AlreadyVisited` | - | no |
    /// | not an http(s) URL | `Invalid` | yes | no |
    /// | hosted platform domain | `Excluded` | yes | no |
    /// | otherwise | `Dispatch` | yes | yes |
    pub fn admit(&mut self, task: &CrawlTask) -> Admission {
        if task.depth > self.max_depth {
            return Admission::TooDeep;
        }

        if !self.visited.insert(task.url.clone()) {
            return Admission::AlreadyVisited;
        }

        let Ok(url) = parse_crawl_url(&task.url) else {
            return Admission::Invalid;
        };
        let Some(host) = host_key(&url) else {
            return Admission::Invalid;
        };

        if is_platform_hosted(&url, &self.excluded_domain) {
            return Admission::Excluded;
        }

        *self.host_pages.entry(host.clone()).or_insert(0) += 1;
        Admission::Dispatch { url, host }
    }

    /// Enqueues links found on a page at `parent_depth`
    ///
    /// Links go in at `parent_depth + 1`; nothing is enqueued past the depth
    /// bound, and already-visited URLs are not queued again. Returns the
    /// number of tasks added.
    pub fn enqueue_links<I>(&mut self, links: I, parent_depth: u32) -> usize
    where
        I: IntoIterator<Item = Url>,
    {
        if !self.can_descend(parent_depth) {
            return 0;
        }

        let depth = parent_depth + 1;
        let mut added = 0;
        for link in links {
            let link = String::from(link);
            if self.visited.contains(&link) {
                continue;
            }
            self.queue.push_back(CrawlTask::new(link, depth));
            added += 1;
        }
        added
    }

    /// Records a discovery for `final_url`
    ///
    /// Returns `true` the first time a final URL is seen and `false` after.
    pub fn record_discovery(&mut self, final_url: &str) -> bool {
        self.reported.insert(final_url.to_string())
    }

    /// Number of distinct final URLs reported
    pub fn discovery_count(&self) -> usize {
        self.reported.len()
    }
}
