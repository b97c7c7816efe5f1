//! URL handling module for wp-hunter
//!
//! This module provides host-key extraction, registrable-domain lookup and
//! the hosted-platform exclusion check.

mod domain;
mod matcher;

use crate::UrlError;
use url::Url;

pub use domain::{host_key, split_registrable};
pub use matcher::is_platform_hosted;

/// Parses a crawlable URL: absolute, `http` or `https`, with a host
///
/// # Examples
///
/// ```
/// use wp_hunter::url::parse_crawl_url;
///
/// assert!(parse_crawl_url("https://example.com/").is_ok());
/// assert!(parse_crawl_url("ftp://example.com/").is_err());
/// assert!(parse_crawl_url("/relative").is_err());
/// ```
pub fn parse_crawl_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if host_key(&url).is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
