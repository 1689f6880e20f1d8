//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub tagline: String,
    pub language: String,
    pub keywords: Vec<String>,
    pub avatar: Option<String>,
    /// Markdown shown on the about page
    pub bio: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub data_dir: String,
    pub static_dir: String,
    pub public_dir: String,

    // Writing
    pub default_category: String,
    pub words_per_minute: usize,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Chrome
    pub menu: Vec<MenuItem>,
    pub social: Vec<SocialLink>,

    // Feed
    pub feed_limit: usize,
    pub related_posts: usize,

    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            description: "Projects, writing and notes".to_string(),
            author: "Jane Doe".to_string(),
            tagline: String::new(),
            language: "en".to_string(),
            keywords: Vec::new(),
            avatar: None,
            bio: "Hi, I build software and write about it.".to_string(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            content_dir: "content/blog".to_string(),
            data_dir: "data".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),

            default_category: "general".to_string(),
            words_per_minute: crate::content::DEFAULT_WORDS_PER_MINUTE,
            highlight: HighlightConfig::default(),

            menu: default_menu(),
            social: Vec::new(),

            feed_limit: 20,
            related_posts: 3,

            contact: ContactConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

fn default_menu() -> Vec<MenuItem> {
    [
        ("Home", "/"),
        ("Blog", "/blog"),
        ("Projects", "/projects"),
        ("Books", "/books"),
        ("Tools", "/tools"),
        ("Stack", "/stack"),
        ("Resume", "/resume"),
        ("Contact", "/contact"),
    ]
    .into_iter()
    .map(|(name, path)| MenuItem {
        name: name.to_string(),
        path: path.to_string(),
    })
    .collect()
}

/// Navbar entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

/// Footer social link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub line_number: bool,
    pub light_theme: String,
    pub dark_theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            line_number: false,
            light_theme: "InspiredGitHub".to_string(),
            dark_theme: "base16-ocean.dark".to_string(),
        }
    }
}

/// Contact form validation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub name_min_chars: usize,
    pub message_min_chars: usize,
    pub message_max_chars: usize,
    pub subject_max_chars: usize,
    /// Prefix for the notification email subject
    pub subject_prefix: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            name_min_chars: 3,
            message_min_chars: 10,
            message_max_chars: 5000,
            subject_max_chars: 200,
            subject_prefix: "[Portfolio]".to_string(),
        }
    }
}

/// Response security header configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Route (and its sub-paths) that may be framed by other sites
    pub embed_route: Option<String>,
    /// Origins allowed to frame the embed route
    pub embed_origins: Vec<String>,
    pub hsts_max_age: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            embed_route: Some("/docs".to_string()),
            embed_origins: vec!["'self'".to_string(), "https:".to_string()],
            hsts_max_age: 63_072_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content/blog");
        assert_eq!(config.words_per_minute, 200);
        assert_eq!(config.contact.name_min_chars, 3);
        assert!(config.menu.iter().any(|m| m.path == "/blog"));
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Portfolio
author: Test User
words_per_minute: 250
contact:
  message_min_chars: 20
security:
  embed_route: /docs/widget
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Portfolio");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.words_per_minute, 250);
        assert_eq!(config.contact.message_min_chars, 20);
        // Fields not given keep their defaults
        assert_eq!(config.contact.name_min_chars, 3);
        assert_eq!(config.security.embed_route.as_deref(), Some("/docs/widget"));
        assert_eq!(config.public_dir, "public");
    }
}
