use url::Url;

/// Extracts the host key used for pacing, page counting and same-host checks
///
/// The key is the lowercase host with any trailing dot removed, followed by
/// `:port` when the URL carries an explicit, non-default port. `url` already
/// drops default ports, so `https://example.com:443/` and
/// `https://example.com/` share a key.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wp_hunter::url::host_key;
///
/// let url = Url::parse("https://Example.COM./path").unwrap();
/// assert_eq!(host_key(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://example.com:8080/").unwrap();
/// assert_eq!(host_key(&url), Some("example.com:8080".to_string()));
/// ```
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    let host = host.trim_end_matches('.');
    if host.is_empty() {
        return None;
    }

    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Splits a host name into `(subdomain, registrable domain)` using the public
/// suffix list
///
/// Returns `None` for hosts that have no registrable part, such as a bare
/// public suffix or `localhost`.
///
/// ```
/// use wp_hunter::url::split_registrable;
///
/// assert_eq!(
///     split_registrable("blog.example.co.uk"),
///     Some(("blog".to_string(), "example.co.uk".to_string()))
/// );
/// assert_eq!(
///     split_registrable("example.org"),
///     Some((String::new(), "example.org".to_string()))
/// );
/// ```
pub fn split_registrable(host: &str) -> Option<(String, String)> {
    let host = host.trim_end_matches('.').to_lowercase();
    let registrable = psl::domain_str(&host)?.to_string();
    let subdomain = host
        .strip_suffix(registrable.as_str())?
        .trim_end_matches('.')
        .to_string();
    Some((subdomain, registrable))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_key_simple() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(host_key(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_host_key_keeps_subdomain() {
        let url = Url::parse("https://blog.example.com/post").unwrap();
        assert_eq!(host_key(&url), Some("blog.example.com".to_string()));
    }

    #[test]
    fn test_host_key_explicit_port() {
        let url = Url::parse("http://127.0.0.1:8080/").unwrap();
        assert_eq!(host_key(&url), Some("127.0.0.1:8080".to_string()));
    }

    #[test]
    fn test_host_key_default_port_dropped() {
        let a = Url::parse("https://example.com:443/").unwrap();
        let b = Url::parse("https://example.com/").unwrap();
        assert_eq!(host_key(&a), host_key(&b));
    }

    #[test]
    fn test_host_key_case_and_trailing_dot() {
        let a = Url::parse("https://EXAMPLE.com./").unwrap();
        let b = Url::parse("https://example.com/").unwrap();
        assert_eq!(host_key(&a), host_key(&b));
    }

    #[test]
    fn test_host_key_none_without_host() {
        let url = Url::parse("mailto:someone@example.com").unwrap();
        assert_eq!(host_key(&url), None);
    }

    #[test]
    fn test_split_nested_subdomain() {
        assert_eq!(
            split_registrable("a.b.example.com"),
            Some(("a.b".to_string(), "example.com".to_string()))
        );
    }

    #[test]
    fn test_split_multi_label_suffix() {
        assert_eq!(
            split_registrable("shop.example.co.uk"),
            Some(("shop".to_string(), "example.co.uk".to_string()))
        );
    }
}
