use serde::Deserialize;

/// Main configuration structure for wp-hunter
///
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
    /// Seed URLs the crawl starts from (depth 0)
    pub seeds: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from seed URLs (inclusive)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Global limit on in-flight fetches
    #[serde(rename = "max-concurrent-requests")]
    pub max_concurrent_requests: u32,

    /// Minimum time between request starts on the same host (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Visited-page count on a host after which its links are no longer followed
    #[serde(rename = "max-pages-per-host")]
    pub max_pages_per_host: u32,

    /// Registrable domain of the hosted platform; never fetched
    #[serde(rename = "excluded-domain")]
    pub excluded_domain: String,

    /// Reserve per-host start slots instead of the best-effort timestamp check
    #[serde(rename = "strict-host-pacing")]
    pub strict_host_pacing: bool,

    /// Stop dispatching after this many seconds and drain in-flight fetches
    #[serde(rename = "max-run-seconds")]
    pub max_run_seconds: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_concurrent_requests: 100,
            request_delay_ms: 200,
            max_pages_per_host: 5,
            excluded_domain: "wordpress.com".to_string(),
            strict_host_pacing: false,
            max_run_seconds: None,
        }
    }
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Total per-request deadline in seconds
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,

    /// Identifying User-Agent header (crawler name plus contact URL)
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Maximum number of body characters kept for fingerprinting
    #[serde(rename = "body-limit")]
    pub body_limit: usize,

    /// Skip TLS certificate validation
    #[serde(rename = "accept-invalid-certs")]
    pub accept_invalid_certs: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: "WordPressCrawlerBot/1.0 (+https://yourdomain.com/crawler-info)"
                .to_string(),
            body_limit: 500_000,
            accept_invalid_certs: true,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File discoveries are appended to
    #[serde(rename = "output-path")]
    pub output_path: String,

    /// Also print each discovery to stdout
    pub echo: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "wordpress_sites.txt".to_string(),
            echo: true,
        }
    }
}
