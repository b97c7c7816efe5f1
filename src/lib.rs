//! wp-hunter: a polite crawler for self-hosted WordPress sites
//!
//! This crate crawls outward from a list of seed URLs, fingerprints every
//! fetched page, and reports sites that run WordPress on their own hosting
//! (anything under `wordpress.com` itself is skipped).

pub mod config;
pub mod crawler;
pub mod fingerprint;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for wp-hunter operations
#[derive(Debug, Error)]
pub enum HunterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid fingerprint pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlStats, Crawler};
pub use fingerprint::{FingerprintRule, Fingerprinter};
pub use output::{Discovery, DiscoverySink};
pub use url::{host_key, is_platform_hosted};
