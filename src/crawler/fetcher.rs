//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client (user agent, timeout, redirects, TLS policy)
//! - Per-host pacing and global admission before each request
//! - Bounded body reads with lossy decoding
//! - Error classification (transient vs unexpected)

use crate::config::FetcherConfig;
use crate::state::RateLimiter;
use crate::url::{host_key, is_platform_hosted};
use reqwest::header::HeaderMap;
use reqwest::{redirect::Policy, Client, Response};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use url::Url;

/// Maximum number of redirect hops followed for one request
pub const MAX_REDIRECTS: usize = 10;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,
    /// Response headers (never truncated)
    pub headers: HeaderMap,
    /// Body, decoded lossily and cut to the configured character budget
    pub body: String,
    /// Final URL after redirects
    pub final_url: Url,
}

/// Result of a fetch operation
///
/// Either a complete page or a failure marker; never partially populated.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Fetched(FetchedPage),
    Failed,
}

impl FetchOutcome {
    /// Returns the page, if the fetch succeeded
    pub fn into_page(self) -> Option<FetchedPage> {
        match self {
            Self::Fetched(page) => Some(page),
            Self::Failed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Fetch failures, split by how loudly they are reported
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, protocol, redirect, body or timeout failure
    #[error("{0}")]
    Transient(reqwest::Error),

    /// Anything else; worth a warning since it may be a bug
    #[error("unexpected fetch failure: {0}")]
    Unexpected(reqwest::Error),

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("fetch cancelled before the request was sent")]
    Cancelled,
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if is_transient(&error) {
            Self::Transient(error)
        } else {
            Self::Unexpected(error)
        }
    }
}

fn is_transient(error: &reqwest::Error) -> bool {
    error.is_timeout()
        || error.is_connect()
        || error.is_request()
        || error.is_redirect()
        || error.is_body()
        || error.is_decode()
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed up to [`MAX_REDIRECTS`] hops; a hop into the
/// hosted platform domain is refused, so those hosts are never contacted.
/// Certificate validation is disabled when `accept_invalid_certs` is set.
///
/// # Example
///
/// ```no_run
/// use wp_hunter::config::FetcherConfig;
/// use wp_hunter::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default(), "wordpress.com").unwrap();
/// ```
pub fn build_http_client(
    config: &FetcherConfig,
    excluded_domain: &str,
) -> Result<Client, reqwest::Error> {
    let excluded_domain = excluded_domain.to_string();
    let policy = Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if is_platform_hosted(attempt.url(), &excluded_domain) {
            attempt.error("redirect into hosted platform domain")
        } else {
            attempt.follow()
        }
    });

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_seconds))
        .redirect(policy)
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Paced, admission-controlled page fetcher
///
/// Cloning is cheap; clones share the client, the rate limiter, the
/// admission semaphore and the cancellation flag.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    limiter: Arc<RateLimiter>,
    admission: Arc<Semaphore>,
    body_limit: usize,
    cancelled: Arc<AtomicBool>,
}

impl Fetcher {
    pub fn new(
        client: Client,
        limiter: Arc<RateLimiter>,
        admission: Arc<Semaphore>,
        body_limit: usize,
    ) -> Self {
        Self {
            client,
            limiter,
            admission,
            body_limit,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stops every clone from sending new requests
    ///
    /// Requests already on the wire run to completion; fetches still waiting
    /// for their pacing slot or admission permit return
    /// [`FetchOutcome::Failed`] without contacting the host.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Fetches one URL
    ///
    /// # Request Flow
    ///
    /// 1. Wait out the host's pacing delay
    /// 2. Acquire a global admission permit
    /// 3. GET with redirects, bounded by the client timeout
    /// 4. Record the response time for the host
    /// 5. Read at most the body budget, decode lossily, truncate
    ///
    /// The cancellation flag is checked before and after the pacing wait and
    /// again once the permit is held.
    ///
    /// Failures never propagate: they are logged (`debug` for transient,
    /// `warn` for unexpected) and reported as [`FetchOutcome::Failed`].
    pub async fn fetch(&self, url: &Url) -> FetchOutcome {
        match self.try_fetch(url).await {
            Ok(page) => FetchOutcome::Fetched(page),
            Err(FetchError::Transient(e)) => {
                tracing::debug!("Failed {}: {}", url, e);
                FetchOutcome::Failed
            }
            Err(FetchError::Cancelled) => {
                tracing::debug!("Abandoned {}: crawl is shutting down", url);
                FetchOutcome::Failed
            }
            Err(e) => {
                tracing::warn!("Unexpected error {}: {}", url, e);
                FetchOutcome::Failed
            }
        }
    }

    async fn try_fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let host = host_key(url).ok_or_else(|| FetchError::MissingHost(url.to_string()))?;

        self.check_cancelled()?;
        self.limiter.wait_turn(&host).await;
        self.check_cancelled()?;

        let page = {
            // A closed semaphore only happens on teardown; fetch unthrottled then.
            let _permit = self.admission.acquire().await.ok();
            self.check_cancelled()?;

            let mut response = self.client.get(url.clone()).send().await?;
            self.limiter.record_request(&host, Instant::now());

            let status = response.status().as_u16();
            let headers = response.headers().clone();
            let final_url = response.url().clone();
            let body = read_body(&mut response, self.body_limit).await?;

            FetchedPage {
                status,
                headers,
                body,
                final_url,
            }
        };

        tracing::trace!("Fetched {} ({}) -> {}", url, page.status, page.final_url);

        Ok(page)
    }

    fn check_cancelled(&self) -> Result<(), FetchError> {
        if self.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        Ok(())
    }
}

/// Reads enough of the body to cover `char_limit` characters
///
/// A UTF-8 character is at most four bytes, so reading stops after
/// `4 * char_limit` bytes; the rest of the body is never downloaded.
async fn read_body(response: &mut Response, char_limit: usize) -> Result<String, reqwest::Error> {
    let byte_budget = char_limit.saturating_mul(4);
    let mut bytes = Vec::new();

    while bytes.len() < byte_budget {
        match response.chunk().await? {
            Some(chunk) => bytes.extend_from_slice(&chunk),
            None => break,
        }
    }
    bytes.truncate(byte_budget);

    Ok(truncate_chars(&String::from_utf8_lossy(&bytes), char_limit))
}

/// Keeps the first `limit` characters of `text`
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}
