//! HTML link extraction
//!
//! Turns a fetched page into the absolute URLs it links to. Parsing goes
//! through `scraper`/html5ever, which recovers from malformed markup instead
//! of failing, so broken pages simply yield fewer links.

use crate::url::host_key;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts every followable `<a href>` target from the page
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` anywhere in the document, resolved against
/// `base_url`, with the fragment removed.
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - fragment-only links (same page anchors)
/// - anything that does not resolve to an `http`/`https` URL
///
/// Results are deduplicated, in document order.
///
/// # Example
///
/// ```
/// use wp_hunter::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/about#team">About</a><a href="https://other.org/">Other</a>"#;
/// let base_url = Url::parse("https://example.com/blog/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links[0].as_str(), "https://example.com/about");
/// assert_eq!(links[1].as_str(), "https://other.org/");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(absolute_url) = resolve_link(href, base_url) {
            if seen.insert(absolute_url.as_str().to_string()) {
                links.push(absolute_url);
            }
        }
    }

    links
}

/// Extracts links that stay on the same host as `base_url`
///
/// Host equality uses [`host_key`], so case, trailing dots and default ports
/// do not split a site in two.
pub fn extract_same_host_links(html: &str, base_url: &Url) -> Vec<Url> {
    let Some(base_host) = host_key(base_url) else {
        return Vec::new();
    };

    extract_links(html, base_url)
        .into_iter()
        .filter(|link| host_key(link).as_deref() == Some(base_host.as_str()))
        .collect()
}

/// Resolves a link href to an absolute URL without its fragment
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }

    absolute_url.set_fragment(None);
    Some(absolute_url)
}
