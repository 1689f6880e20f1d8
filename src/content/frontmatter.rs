//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a post.
///
/// Required fields are kept optional here so that the loader can report
/// exactly which one is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrontMatter {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<String>,
    pub updated_at: Option<String>,
    pub category: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    pub featured: bool,
    pub image_url: Option<String>,
}

impl FrontMatter {
    /// Split a leading `---` block from the body and parse it.
    ///
    /// Returns `Ok(None)` when the content has no front-matter block.
    pub fn parse(content: &str) -> Result<Option<(Self, &str)>, serde_yaml::Error> {
        let Some((yaml, body)) = split(content) else {
            return Ok(None);
        };

        if yaml.trim().is_empty() {
            return Ok(Some((FrontMatter::default(), body)));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml)?;
        Ok(Some((fm, body)))
    }

    /// Parse the publication date
    pub fn parse_published(&self) -> Option<DateTime<Utc>> {
        self.published_at.as_deref().and_then(parse_date_string)
    }

    /// Parse the last-updated date
    pub fn parse_updated(&self) -> Option<DateTime<Utc>> {
        self.updated_at.as_deref().and_then(parse_date_string)
    }
}

/// Split `---\n<yaml>\n---\n<body>` into its two halves
fn split(content: &str) -> Option<(&str, &str)> {
    let content = content.trim_start_matches('\u{feff}');
    let rest = content
        .strip_prefix("---\r\n")
        .or_else(|| content.strip_prefix("---\n"))?;

    // An empty block closes immediately
    if let Some(body) = rest
        .strip_prefix("---\r\n")
        .or_else(|| rest.strip_prefix("---\n"))
    {
        return Some(("", body));
    }

    let end_pos = rest.find("\n---")?;
    let yaml = &rest[..end_pos];
    let after = &rest[end_pos + 4..];

    // The closing fence must be a line of its own
    let body = match after.find('\n') {
        Some(nl) if after[..nl].trim().is_empty() => &after[nl + 1..],
        None if after.trim().is_empty() => "",
        _ => return None,
    };

    Some((yaml, body.trim_start_matches(['\n', '\r'])))
}

/// Parse a date string in various formats
pub(crate) fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];

    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
slug: hello-world
title: Hello World
description: First post
author: Jane
publishedAt: 2024-01-15
category: notes
tags:
  - rust
  - web
featured: true
imageUrl: /images/hello.png
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap().unwrap();
        assert_eq!(fm.slug.as_deref(), Some("hello-world"));
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.tags, vec!["rust", "web"]);
        assert!(fm.featured);
        assert_eq!(fm.image_url.as_deref(), Some("/images/hello.png"));
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_optional_fields_default() {
        let content = "---\ntitle: Minimal\n---\nBody";
        let (fm, body) = FrontMatter::parse(content).unwrap().unwrap();
        assert!(fm.tags.is_empty());
        assert!(!fm.featured);
        assert_eq!(fm.image_url, None);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_single_string_tags() {
        let content = "---\ntitle: One\ntags: Notes\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap().unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
    }

    #[test]
    fn test_no_frontmatter() {
        assert!(FrontMatter::parse("# Just markdown\n").unwrap().is_none());
        // Unclosed block
        assert!(FrontMatter::parse("---\ntitle: x\nno end").unwrap().is_none());
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        assert!(FrontMatter::parse(content).is_err());
    }

    #[test]
    fn test_horizontal_rule_in_body_is_kept() {
        let content = "---\ntitle: Rules\n---\nabove\n\n---\n\nbelow\n";
        let (_, body) = FrontMatter::parse(content).unwrap().unwrap();
        assert!(body.contains("above"));
        assert!(body.contains("below"));
    }

    #[test]
    fn test_parse_dates() {
        let fm = FrontMatter {
            published_at: Some("2024-01-15".to_string()),
            updated_at: Some("2024-02-01T08:30:00+02:00".to_string()),
            ..Default::default()
        };

        let published = fm.parse_published().unwrap();
        assert_eq!(published.format("%Y-%m-%d").to_string(), "2024-01-15");

        let updated = fm.parse_updated().unwrap();
        assert_eq!(updated.format("%H:%M").to_string(), "06:30");

        assert!(parse_date_string("next tuesday").is_none());
        assert!(parse_date_string("2024-01-15 10:30").is_some());
    }
}
