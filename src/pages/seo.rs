//! Page metadata: title, canonical URL, Open Graph and JSON-LD

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::SiteConfig;
use crate::content::Post;
use crate::helpers::{full_url_for, script_json};

/// Everything the layout needs for the `<head>` of a page
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    /// Full `<title>` text
    pub title: String,
    pub description: String,
    pub canonical: String,
    /// Open Graph type: `website` or `article`
    pub og_type: &'static str,
    pub image: Option<String>,
    pub keywords: String,
    pub published_time: Option<String>,
    /// Serialized JSON-LD, safe to embed in a script element
    pub json_ld: String,
}

impl PageMeta {
    /// Metadata for a regular page. `title` is the page's own title; the
    /// home page passes `None` and gets the bare site title.
    pub fn new(
        config: &SiteConfig,
        path: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Self {
        Self {
            title: page_title(config, title),
            description: description.unwrap_or(&config.description).to_string(),
            canonical: full_url_for(config, path),
            og_type: "website",
            image: config.avatar.as_deref().map(|a| absolute(config, a)),
            keywords: config.keywords.join(", "),
            published_time: None,
            json_ld: script_json(&person(config)),
        }
    }

    /// Metadata for a blog post
    pub fn for_post(config: &SiteConfig, post: &Post) -> Self {
        let path = format!("/blog/{}", post.slug);
        let mut keywords: Vec<&str> = post.tags.iter().map(String::as_str).collect();
        keywords.extend(config.keywords.iter().map(String::as_str));

        Self {
            title: page_title(config, Some(&post.title)),
            description: post.description.clone(),
            canonical: full_url_for(config, &path),
            og_type: "article",
            image: post
                .image_url
                .as_deref()
                .or(config.avatar.as_deref())
                .map(|i| absolute(config, i)),
            keywords: keywords.join(", "),
            published_time: Some(post.published_at.to_rfc3339()),
            json_ld: script_json(&blog_posting(config, post)),
        }
    }
}

fn page_title(config: &SiteConfig, title: Option<&str>) -> String {
    match title {
        Some(title) if !title.is_empty() => format!("{} | {}", title, config.title),
        _ => config.title.clone(),
    }
}

fn absolute(config: &SiteConfig, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        full_url_for(config, url)
    }
}

/// Schema.org `Person` describing the site owner
pub fn person(config: &SiteConfig) -> Value {
    let mut person = json!({
        "@context": "https://schema.org",
        "@type": "Person",
        "name": config.author,
        "url": full_url_for(config, "/"),
        "description": config.description,
    });
    if !config.tagline.is_empty() {
        person["jobTitle"] = json!(config.tagline);
    }
    if let Some(avatar) = &config.avatar {
        person["image"] = json!(absolute(config, avatar));
    }
    if !config.social.is_empty() {
        let links: Vec<&str> = config.social.iter().map(|s| s.url.as_str()).collect();
        person["sameAs"] = json!(links);
    }
    person
}

/// Schema.org `BlogPosting` for a post
pub fn blog_posting(config: &SiteConfig, post: &Post) -> Value {
    let url = full_url_for(config, &format!("/blog/{}", post.slug));
    let mut posting = json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": post.title,
        "description": post.description,
        "datePublished": post.published_at.to_rfc3339(),
        "dateModified": post.updated_at.unwrap_or(post.published_at).to_rfc3339(),
        "author": {
            "@type": "Person",
            "name": post.author,
            "url": full_url_for(config, "/"),
        },
        "mainEntityOfPage": { "@type": "WebPage", "@id": url },
        "url": url,
        "articleSection": post.category,
        "keywords": post.tags.iter().cloned().collect::<Vec<_>>(),
        "timeRequired": format!("PT{}M", post.reading_time),
    });
    if let Some(image) = &post.image_url {
        posting["image"] = json!(absolute(config, image));
    }
    posting
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SocialLink;
    use chrono::{TimeZone, Utc};

    fn config() -> SiteConfig {
        SiteConfig {
            title: "Jane Doe".to_string(),
            url: "https://jane.dev".to_string(),
            author: "Jane Doe".to_string(),
            social: vec![SocialLink {
                name: "GitHub".to_string(),
                url: "https://github.com/jane".to_string(),
            }],
            ..Default::default()
        }
    }

    fn post() -> Post {
        Post {
            slug: "hello".to_string(),
            title: "Hello </script>".to_string(),
            description: "First post".to_string(),
            body: String::new(),
            author: "Jane Doe".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            updated_at: None,
            reading_time: 4,
            category: "rust".to_string(),
            tags: ["rust", "web"].iter().map(|t| t.to_string()).collect(),
            featured: false,
            image_url: Some("/assets/hello.png".to_string()),
            source: Default::default(),
        }
    }

    #[test]
    fn test_page_meta() {
        let meta = PageMeta::new(&config(), "/projects", Some("Projects"), None);
        assert_eq!(meta.title, "Projects | Jane Doe");
        assert_eq!(meta.canonical, "https://jane.dev/projects");
        assert_eq!(meta.og_type, "website");
        assert!(meta.json_ld.contains("\"@type\":\"Person\""));
        assert!(meta.json_ld.contains("https://github.com/jane"));

        let home = PageMeta::new(&config(), "/", None, None);
        assert_eq!(home.title, "Jane Doe");
    }

    #[test]
    fn test_post_meta() {
        let meta = PageMeta::for_post(&config(), &post());
        assert_eq!(meta.og_type, "article");
        assert_eq!(meta.canonical, "https://jane.dev/blog/hello");
        assert_eq!(meta.image.as_deref(), Some("https://jane.dev/assets/hello.png"));
        assert!(meta.keywords.starts_with("rust, web"));
        assert!(meta.json_ld.contains("\"@type\":\"BlogPosting\""));
        assert!(meta.json_ld.contains("PT4M"));
        assert!(!meta.json_ld.contains("</script>"));
    }
}
