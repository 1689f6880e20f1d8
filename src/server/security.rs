//! Security headers added to every page response

use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::config::SecurityConfig;

const PERMISSIONS_POLICY: HeaderName = HeaderName::from_static("permissions-policy");

/// Inline styles and the theme script live in the layout
const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     script-src 'self' 'unsafe-inline'; \
     style-src 'self' 'unsafe-inline'; \
     img-src 'self' data: https:; \
     font-src 'self' data:; \
     connect-src 'self'; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self'";

/// Paths that get no security headers
fn is_exempt(path: &str) -> bool {
    path == "/api"
        || path.starts_with("/api/")
        || path.starts_with("/assets/")
        || path == "/favicon.ico"
}

fn is_embed_path(path: &str, config: &SecurityConfig) -> bool {
    match config.embed_route.as_deref().map(|r| r.trim_end_matches('/')) {
        Some(route) if !route.is_empty() => {
            path == route
                || path
                    .strip_prefix(route)
                    .is_some_and(|rest| rest.starts_with('/'))
        }
        _ => false,
    }
}

/// Headers for a response to `path`; empty for API and asset paths
pub fn security_headers_for(path: &str, config: &SecurityConfig) -> Vec<(HeaderName, String)> {
    if is_exempt(path) {
        return Vec::new();
    }

    let frame_ancestors = if is_embed_path(path, config) && !config.embed_origins.is_empty() {
        config.embed_origins.join(" ")
    } else {
        "'none'".to_string()
    };

    vec![
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
        (
            header::STRICT_TRANSPORT_SECURITY,
            format!("max-age={}; includeSubDomains", config.hsts_max_age),
        ),
        (
            header::REFERRER_POLICY,
            "strict-origin-when-cross-origin".to_string(),
        ),
        (
            PERMISSIONS_POLICY,
            "camera=(), microphone=(), geolocation=()".to_string(),
        ),
        (
            header::CONTENT_SECURITY_POLICY,
            format!("{}; frame-ancestors {}", CONTENT_SECURITY_POLICY, frame_ancestors),
        ),
    ]
}

/// Middleware applying [`security_headers_for`]
pub async fn security_headers(
    State(config): State<Arc<SecurityConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    for (name, value) in security_headers_for(&path, &config) {
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                response.headers_mut().insert(name, value);
            }
            Err(_) => tracing::warn!("Skipping invalid {} header value: {:?}", name, value),
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(headers: &'a [(HeaderName, String)], name: &HeaderName) -> Option<&'a str> {
        headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_page_headers() {
        let headers = security_headers_for("/blog", &SecurityConfig::default());
        assert_eq!(
            find(&headers, &header::X_CONTENT_TYPE_OPTIONS),
            Some("nosniff")
        );
        assert_eq!(
            find(&headers, &header::STRICT_TRANSPORT_SECURITY),
            Some("max-age=63072000; includeSubDomains")
        );
        assert_eq!(
            find(&headers, &PERMISSIONS_POLICY),
            Some("camera=(), microphone=(), geolocation=()")
        );
        let csp = find(&headers, &header::CONTENT_SECURITY_POLICY).unwrap();
        assert!(csp.ends_with("frame-ancestors 'none'"));
    }

    #[test]
    fn test_exempt_paths() {
        let config = SecurityConfig::default();
        assert!(security_headers_for("/api/contact", &config).is_empty());
        assert!(security_headers_for("/assets/site.css", &config).is_empty());
        assert!(security_headers_for("/favicon.ico", &config).is_empty());
        assert!(!security_headers_for("/apiary", &config).is_empty());
    }

    #[test]
    fn test_embed_route() {
        let config = SecurityConfig::default();
        for path in ["/docs", "/docs/intro"] {
            let headers = security_headers_for(path, &config);
            let csp = find(&headers, &header::CONTENT_SECURITY_POLICY).unwrap();
            assert!(csp.ends_with("frame-ancestors 'self' https:"), "{}", path);
        }

        let headers = security_headers_for("/docsify", &config);
        let csp = find(&headers, &header::CONTENT_SECURITY_POLICY).unwrap();
        assert!(csp.ends_with("frame-ancestors 'none'"));

        let config = SecurityConfig {
            embed_route: None,
            ..Default::default()
        };
        let headers = security_headers_for("/docs", &config);
        let csp = find(&headers, &header::CONTENT_SECURITY_POLICY).unwrap();
        assert!(csp.ends_with("frame-ancestors 'none'"));
    }
}
