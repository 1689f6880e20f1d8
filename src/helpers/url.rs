//! URL helper functions

use crate::config::SiteConfig;

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/blog/hello") // -> "/portfolio/blog/hello"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about") // -> "https://example.com/about"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Encode one path segment (a tag name, a slug)
pub fn encode_segment(segment: &str) -> String {
    percent_encoding::utf8_percent_encode(segment, percent_encoding::NON_ALPHANUMERIC).to_string()
}

/// Whether `target` is a path on this site, safe to redirect to.
/// Rejects absolute and scheme-relative URLs.
pub fn is_local_path(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\")
        && !target.chars().any(|c| c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com/".to_string();
        config.root = "/site/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/blog/hello"), "/site/blog/hello");
        assert_eq!(url_for(&config, ""), "/site/");
        assert_eq!(url_for(&SiteConfig::default(), "/about"), "/about");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/about"),
            "https://example.com/site/about"
        );
        assert_eq!(
            full_url_for(&SiteConfig::default(), "/"),
            "http://localhost:4000/"
        );
    }

    #[test]
    fn test_segments() {
        assert_eq!(encode_segment("c++ & rust"), "c%2B%2B%20%26%20rust");
    }

    #[test]
    fn test_is_local_path() {
        assert!(is_local_path("/blog?tags=rust"));
        assert!(!is_local_path("https://evil.example"));
        assert!(!is_local_path("//evil.example"));
        assert!(!is_local_path("/\\evil.example"));
        assert!(!is_local_path("blog"));
        assert!(!is_local_path("/a\r\nSet-Cookie: x"));
    }
}
