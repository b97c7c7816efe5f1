//! Output sink traits and types
//!
//! This module defines the trait interface for discovery sinks and the
//! discovery record they receive.

use std::fmt;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A confirmed WordPress site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Host key of the final URL
    pub host: String,

    /// Label of the fingerprint rule that matched
    pub evidence: String,

    /// URL the page was served from after redirects
    pub final_url: String,
}

impl Discovery {
    /// Renders the append-only record line: `host | evidence | final URL`
    pub fn to_line(&self) -> String {
        format!("{} | {} | {}", self.host, self.evidence, self.final_url)
    }
}

impl fmt::Display for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Receives discoveries as soon as they are confirmed
///
/// Sinks are driven from the crawl loop, one discovery at a time, and must
/// make each record durable (or visible) before returning.
pub trait DiscoverySink: Send {
    /// Records a single discovery
    fn record(&mut self, discovery: &Discovery) -> OutputResult<()>;

    /// Called once after the crawl finishes
    fn finalize(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_format() {
        let discovery = Discovery {
            host: "blog.example.org".to_string(),
            evidence: "X-Powered-By header".to_string(),
            final_url: "https://blog.example.org/".to_string(),
        };
        assert_eq!(
            discovery.to_line(),
            "blog.example.org | X-Powered-By header | https://blog.example.org/"
        );
        assert_eq!(discovery.to_string(), discovery.to_line());
    }
}
