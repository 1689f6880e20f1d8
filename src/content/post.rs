//! Post model

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::Serialize;
use std::path::PathBuf;

/// Default reading speed used for reading-time estimates
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

/// A blog post loaded from the content directory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique URL key
    pub slug: String,

    pub title: String,

    pub description: String,

    /// Raw markdown body (front-matter removed)
    pub body: String,

    pub author: String,

    pub published_at: DateTime<Utc>,

    pub updated_at: Option<DateTime<Utc>>,

    /// Estimated minutes to read, rounded up
    pub reading_time: usize,

    pub category: String,

    /// Tags in the order they were written, duplicates removed
    pub tags: IndexSet<String>,

    pub featured: bool,

    pub image_url: Option<String>,

    /// Source file the post was read from
    #[serde(skip)]
    pub source: PathBuf,
}

impl Post {
    /// Whether the post carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Get the newer neighbour in a newest-first list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the older neighbour in a newest-first list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }

    /// Other posts sharing at least one tag, in list order
    pub fn related<'a>(&self, posts: &'a [Post], limit: usize) -> Vec<&'a Post> {
        posts
            .iter()
            .filter(|p| p.slug != self.slug)
            .filter(|p| p.tags.iter().any(|t| self.tags.contains(t)))
            .take(limit)
            .collect()
    }
}

/// Estimate reading time in whole minutes, never less than one
pub fn reading_time(text: &str, words_per_minute: usize) -> usize {
    let wpm = words_per_minute.max(1);
    count_words(text).div_ceil(wpm).max(1)
}

/// Count words in text (CJK characters count one each)
pub fn count_words(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphanumeric() && !is_cjk(c) {
            if !in_word {
                in_word = true;
                count += 1;
            }
        } else if is_cjk(c) {
            count += 1;
            in_word = false;
        } else if c == '\'' || c == '-' {
            // Keep contractions and hyphenated words together
        } else {
            in_word = false;
        }
    }

    count
}

fn is_cjk(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}
