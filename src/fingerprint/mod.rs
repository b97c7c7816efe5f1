//! Page fingerprinting
//!
//! Classifies a fetched page as WordPress or not by running an ordered list
//! of rules against the final URL, the body and the response headers. The
//! first rule that fires wins, so cheaper and more specific rules go first.

mod rules;

pub use rules::{header_value, wordpress_rules, FingerprintRule, HeaderPredicate, PatternScope};

use reqwest::header::HeaderMap;

/// Ordered, stateless page classifier
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    rules: Vec<FingerprintRule>,
}

impl Fingerprinter {
    /// Creates a classifier from rules in evaluation order
    pub fn new(rules: Vec<FingerprintRule>) -> Self {
        Self { rules }
    }

    /// Creates a classifier with the canonical WordPress rule set
    pub fn wordpress() -> Result<Self, regex::Error> {
        Ok(Self::new(wordpress_rules()?))
    }

    /// Returns the rules in evaluation order
    pub fn rules(&self) -> &[FingerprintRule] {
        &self.rules
    }

    /// Classifies a page
    ///
    /// Returns the evidence label of the first matching rule, or `None`.
    /// When both `body` and `headers` are absent no rule is evaluated.
    ///
    /// # Example
    ///
    /// ```
    /// use wp_hunter::Fingerprinter;
    ///
    /// let fingerprinter = Fingerprinter::wordpress().unwrap();
    /// let body = r#"<link rel="stylesheet" href="/wp-includes/css/dist/style.css">"#;
    /// assert_eq!(
    ///     fingerprinter.classify("https://example.com/", Some(body), None),
    ///     Some("wp-includes path")
    /// );
    /// ```
    pub fn classify(
        &self,
        url: &str,
        body: Option<&str>,
        headers: Option<&HeaderMap>,
    ) -> Option<&str> {
        if body.is_none() && headers.is_none() {
            return None;
        }

        let empty = HeaderMap::new();
        let headers = headers.unwrap_or(&empty);

        self.rules
            .iter()
            .find(|rule| rule.matches(url, body, headers))
            .map(FingerprintRule::label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    const URL: &str = "https://example.com/";

    fn fingerprinter() -> Fingerprinter {
        Fingerprinter::wordpress().unwrap()
    }

    #[test]
    fn test_nothing_to_inspect() {
        assert_eq!(fingerprinter().classify(URL, None, None), None);
    }

    #[test]
    fn test_plain_page_does_not_match() {
        let body = "<html><head><title>Hello</title></head><body>Static site</body></html>";
        assert_eq!(
            fingerprinter().classify(URL, Some(body), Some(&HeaderMap::new())),
            None
        );
    }

    #[test]
    fn test_generator_meta_case_insensitive() {
        let body = r#"<META NAME="generator" content="WordPress 6.5.2" />"#;
        assert_eq!(
            fingerprinter().classify(URL, Some(body), None),
            Some("meta generator")
        );
    }

    #[test]
    fn test_generator_meta_beats_xmlrpc() {
        let body = r#"<head>
            <meta name="generator" content="WordPress 6.4" />
            <link rel="EditURI" href="https://example.com/xmlrpc.php?rsd" />
        </head>"#;
        assert_eq!(
            fingerprinter().classify(URL, Some(body), None),
            Some("meta generator")
        );
    }

    #[test]
    fn test_wp_content_requires_known_subdir() {
        let fp = fingerprinter();
        assert_eq!(
            fp.classify(URL, Some(r#"<img src="/wp-content/uploads/2024/a.png">"#), None),
            Some("wp-content path")
        );
        assert_eq!(
            fp.classify(URL, Some(r#"<img src="/wp-content/cache/a.png">"#), None),
            None
        );
    }

    #[test]
    fn test_login_and_admin_paths() {
        let fp = fingerprinter();
        assert_eq!(
            fp.classify(URL, Some(r#"<a href="/wp-login.php">Log in</a>"#), None),
            Some("wp-login.php")
        );
        assert_eq!(
            fp.classify(URL, Some(r#"<a href="/wp-admin/">Dashboard</a>"#), None),
            Some("wp-admin")
        );
    }

    #[test]
    fn test_powered_by_header_with_empty_body() {
        let mut headers = HeaderMap::new();
        headers.insert("x-powered-by", HeaderValue::from_static("WordPress"));
        assert_eq!(
            fingerprinter().classify(URL, None, Some(&headers)),
            Some("X-Powered-By header")
        );
    }

    #[test]
    fn test_link_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Link",
            HeaderValue::from_static(r#"<https://example.com/wp-json/>; rel="https://api.w.org/""#),
        );
        assert_eq!(
            fingerprinter().classify(URL, Some("<html></html>"), Some(&headers)),
            Some("Link header wp- prefix")
        );
    }

    #[test]
    fn test_header_rules_precede_later_body_rules() {
        let mut headers = HeaderMap::new();
        headers.insert("x-powered-by", HeaderValue::from_static("wordpress.com VIP"));
        let body = r#"<link rel="pingback" href="/xmlrpc.php">"#;
        assert_eq!(
            fingerprinter().classify(URL, Some(body), Some(&headers)),
            Some("X-Powered-By header")
        );
    }

    #[test]
    fn test_readme_and_rest_api() {
        let fp = fingerprinter();
        assert_eq!(
            fp.classify(URL, Some("See /readme.html for the WordPress version"), None),
            Some("readme.html")
        );
        assert_eq!(
            fp.classify(URL, Some(r#"fetch("/wp-json/wp/v2/posts")"#), None),
            Some("REST API endpoint")
        );
    }

    #[test]
    fn test_readme_in_url_with_empty_body() {
        let fp = fingerprinter();
        assert_eq!(
            fp.classify("https://x.org/readme.html?v=wordpress", Some(""), None),
            Some("readme.html")
        );
    }

    #[test]
    fn test_custom_rule_order_respected() {
        let fp = Fingerprinter::new(vec![
            FingerprintRule::body("xmlrpc", "first").unwrap(),
            FingerprintRule::body("generator", "second").unwrap(),
        ]);
        assert_eq!(
            fp.classify(URL, Some(r#"<meta name="generator"> xmlrpc"#), None),
            Some("first")
        );
        assert_eq!(fp.rules().len(), 2);
    }
}
