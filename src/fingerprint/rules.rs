//! Fingerprint rule definitions
//!
//! A rule is either a text pattern searched in the page body (and optionally
//! the final URL) or a predicate over the response headers. Rules carry the
//! evidence label reported when they fire.

use regex::Regex;
use reqwest::header::HeaderMap;

/// Signature of a header-based rule
pub type HeaderPredicate = fn(&HeaderMap) -> bool;

/// Where a body pattern is searched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternScope {
    /// Page body only
    Body,
    /// Page body, then the final URL
    BodyOrUrl,
}

/// A single classification test with its evidence label
#[derive(Debug, Clone)]
pub enum FingerprintRule {
    BodyPattern {
        pattern: Regex,
        scope: PatternScope,
        label: String,
    },
    HeaderPredicate {
        predicate: HeaderPredicate,
        label: String,
    },
}

impl FingerprintRule {
    /// Builds a body rule from a regular expression
    pub fn body(pattern: &str, label: &str) -> Result<Self, regex::Error> {
        Self::pattern(pattern, PatternScope::Body, label)
    }

    /// Builds a body rule with an explicit search scope
    pub fn pattern(pattern: &str, scope: PatternScope, label: &str) -> Result<Self, regex::Error> {
        Ok(Self::BodyPattern {
            pattern: Regex::new(pattern)?,
            scope,
            label: label.to_string(),
        })
    }

    /// Builds a header rule
    pub fn header(predicate: HeaderPredicate, label: &str) -> Self {
        Self::HeaderPredicate {
            predicate,
            label: label.to_string(),
        }
    }

    /// Human-readable evidence label
    pub fn label(&self) -> &str {
        match self {
            Self::BodyPattern { label, .. } | Self::HeaderPredicate { label, .. } => label,
        }
    }

    /// Evaluates this rule
    ///
    /// Body patterns never match an absent or empty body, though a
    /// `BodyOrUrl` pattern still checks the URL. Header predicates see an
    /// empty map when headers are absent.
    pub fn matches(&self, url: &str, body: Option<&str>, headers: &HeaderMap) -> bool {
        match self {
            Self::BodyPattern { pattern, scope, .. } => {
                let in_body = body.is_some_and(|b| !b.is_empty() && pattern.is_match(b));
                in_body || (*scope == PatternScope::BodyOrUrl && pattern.is_match(url))
            }
            Self::HeaderPredicate { predicate, .. } => predicate(headers),
        }
    }
}

/// Case-insensitive header lookup with an empty-string default
pub fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

fn powered_by_wordpress(headers: &HeaderMap) -> bool {
    header_value(headers, "x-powered-by")
        .to_lowercase()
        .starts_with("wordpress")
}

fn link_header_wp_prefix(headers: &HeaderMap) -> bool {
    header_value(headers, "link").to_lowercase().contains("wp-")
}

/// The canonical WordPress rule set, most specific first
pub fn wordpress_rules() -> Result<Vec<FingerprintRule>, regex::Error> {
    Ok(vec![
        FingerprintRule::body(
            r#"(?i)<meta[^>]+name=["']generator["'][^>]+wordpress"#,
            "meta generator",
        )?,
        FingerprintRule::body(r"/wp-includes/", "wp-includes path")?,
        FingerprintRule::body(r"/wp-content/(themes|plugins|uploads)/", "wp-content path")?,
        FingerprintRule::body(r"wp-login\.php", "wp-login.php")?,
        FingerprintRule::body(r"wp-admin/", "wp-admin")?,
        FingerprintRule::header(powered_by_wordpress, "X-Powered-By header"),
        FingerprintRule::header(link_header_wp_prefix, "Link header wp- prefix"),
        FingerprintRule::body(r"xmlrpc\.php", "xmlrpc.php")?,
        FingerprintRule::pattern(
            r#"(?i)/readme\.html[^"]*wordpress"#,
            PatternScope::BodyOrUrl,
            "readme.html",
        )?,
        FingerprintRule::body(r"/wp-json/wp/v2/", "REST API endpoint")?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_rule_order_is_fixed() {
        let labels: Vec<String> = wordpress_rules()
            .unwrap()
            .iter()
            .map(|r| r.label().to_string())
            .collect();

        assert_eq!(
            labels,
            vec![
                "meta generator",
                "wp-includes path",
                "wp-content path",
                "wp-login.php",
                "wp-admin",
                "X-Powered-By header",
                "Link header wp- prefix",
                "xmlrpc.php",
                "readme.html",
                "REST API endpoint",
            ]
        );
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Powered-By", HeaderValue::from_static("WordPress VIP"));
        assert_eq!(header_value(&headers, "x-powered-by"), "WordPress VIP");
        assert_eq!(header_value(&headers, "link"), "");
        assert!(powered_by_wordpress(&headers));
    }

    #[test]
    fn test_powered_by_requires_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert("x-powered-by", HeaderValue::from_static("PHP/8.2"));
        assert!(!powered_by_wordpress(&headers));
    }

    #[test]
    fn test_body_rule_ignores_missing_body() {
        let rule = FingerprintRule::body(r"xmlrpc\.php", "xmlrpc.php").unwrap();
        let headers = HeaderMap::new();
        assert!(!rule.matches("https://example.com/xmlrpc.php", None, &headers));
        assert!(rule.matches("https://example.com/", Some("/xmlrpc.php?rsd"), &headers));
    }

    #[test]
    fn test_url_scope_only_for_flagged_rules() {
        let headers = HeaderMap::new();
        let url = "https://example.com/readme.html?from=wordpress";

        let body_only =
            FingerprintRule::body(r#"(?i)/readme\.html[^"]*wordpress"#, "readme.html").unwrap();
        assert!(!body_only.matches(url, Some("<html></html>"), &headers));

        let with_url = FingerprintRule::pattern(
            r#"(?i)/readme\.html[^"]*wordpress"#,
            PatternScope::BodyOrUrl,
            "readme.html",
        )
        .unwrap();
        assert!(with_url.matches(url, Some("<html></html>"), &headers));
    }

    #[test]
    fn test_url_scope_matches_with_empty_or_missing_body() {
        let headers = HeaderMap::new();
        let url = "https://example.org/readme.html?v=wordpress";
        let rule = FingerprintRule::pattern(
            r#"(?i)/readme\.html[^"]*wordpress"#,
            PatternScope::BodyOrUrl,
            "readme.html",
        )
        .unwrap();

        assert!(rule.matches(url, Some(""), &headers));
        assert!(rule.matches(url, None, &headers));
        assert!(!rule.matches("https://example.org/", Some(""), &headers));
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(FingerprintRule::body("(unclosed", "broken").is_err());
    }
}
