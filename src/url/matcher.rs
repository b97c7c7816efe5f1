use crate::url::domain::split_registrable;
use url::{Host, Url};

/// Checks whether a URL is served by the hosted platform itself
///
/// A URL is excluded when its registrable domain is `platform_domain`
/// (`wordpress.com`, `foo.wordpress.com`) or when its subdomain chain ends in
/// `.<platform_domain>`. Matching is label-based, so look-alikes such as
/// `mywordpress.com.example.org` are not excluded. IP-literal hosts never
/// match.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wp_hunter::url::is_platform_hosted;
///
/// let hosted = Url::parse("https://en.blog.wordpress.com/").unwrap();
/// assert!(is_platform_hosted(&hosted, "wordpress.com"));
///
/// let lookalike = Url::parse("https://mywordpress.com.example.org/").unwrap();
/// assert!(!is_platform_hosted(&lookalike, "wordpress.com"));
/// ```
pub fn is_platform_hosted(url: &Url, platform_domain: &str) -> bool {
    let host = match url.host() {
        Some(Host::Domain(domain)) => domain,
        _ => return false,
    };

    let platform = platform_domain.to_lowercase();

    let Some((subdomain, registrable)) = split_registrable(host) else {
        // The host is itself a public suffix; only an exact match counts.
        return host.trim_end_matches('.').eq_ignore_ascii_case(&platform);
    };

    let dotted = format!(".{}", platform);

    // Private-section suffix entries can push the registrable domain below
    // the platform domain, so a registrable ending in it also counts.
    registrable == platform || registrable.ends_with(&dotted) || subdomain.ends_with(&dotted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosted(url: &str) -> bool {
        is_platform_hosted(&Url::parse(url).unwrap(), "wordpress.com")
    }

    #[test]
    fn test_bare_platform_domain() {
        assert!(hosted("https://wordpress.com/"));
        assert!(hosted("http://WORDPRESS.COM/start"));
    }

    #[test]
    fn test_platform_subdomains() {
        assert!(hosted("https://myblog.wordpress.com/"));
        assert!(hosted("https://en.blog.wordpress.com/2024/01/"));
    }

    #[test]
    fn test_subdomain_chain_ending_in_platform() {
        // Registrable domain is example.org, but the subdomain chain ends in
        // the platform domain.
        assert!(hosted("https://a.wordpress.com.example.org/"));
    }

    #[test]
    fn test_lookalikes_not_excluded() {
        assert!(!hosted("https://mywordpress.com.example.org/"));
        assert!(!hosted("https://wordpress.com.example.org/"));
        assert!(!hosted("https://notwordpress.com/"));
        assert!(!hosted("https://wordpress.org/"));
        assert!(!hosted("https://example.com/wordpress.com/"));
    }

    #[test]
    fn test_self_hosted_sites_not_excluded() {
        assert!(!hosted("https://blog.example.co.uk/"));
        assert!(!hosted("https://wpsites.net/"));
    }

    #[test]
    fn test_ip_and_local_hosts_never_excluded() {
        assert!(!hosted("http://127.0.0.1:8080/"));
        assert!(!hosted("http://[::1]/"));
        assert!(!hosted("http://localhost/"));
    }

    #[test]
    fn test_custom_platform_domain() {
        let url = Url::parse("https://shop.myplatform.io/").unwrap();
        assert!(is_platform_hosted(&url, "myplatform.io"));
        assert!(!is_platform_hosted(&url, "wordpress.com"));
    }
}
