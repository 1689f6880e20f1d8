//! Content loader - loads posts from the content directory

use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::post::reading_time;
use super::{ContentError, FrontMatter, Post};
use crate::Site;

/// Loads posts from the content directory.
///
/// Nothing is cached: every call re-reads the directory.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    content_dir: PathBuf,
    words_per_minute: usize,
}

impl ContentLoader {
    /// Create a loader for the site's content directory
    pub fn new(site: &Site) -> Self {
        Self::with_dir(&site.content_dir, site.config.words_per_minute)
    }

    /// Create a loader for an explicit directory
    pub fn with_dir<P: AsRef<Path>>(content_dir: P, words_per_minute: usize) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
            words_per_minute,
        }
    }

    /// Load every post, newest first.
    ///
    /// A single malformed file fails the whole load.
    pub fn load_all_posts(&self) -> Result<Vec<Post>, ContentError> {
        // Surface a missing or unreadable directory before walking it
        fs::read_dir(&self.content_dir).map_err(|source| ContentError::Directory {
            path: self.content_dir.clone(),
            source,
        })?;

        let mut posts = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for entry in WalkDir::new(&self.content_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ContentError::Directory {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.content_dir.clone()),
                source: e.into(),
            })?;

            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            let post = self.load_post(path)?;
            if let Some(first) = seen.insert(post.slug.clone(), path.to_path_buf()) {
                return Err(ContentError::DuplicateSlug {
                    slug: post.slug,
                    first,
                    second: path.to_path_buf(),
                });
            }
            tracing::debug!("Loaded post {} from {:?}", post.slug, path);
            posts.push(post);
        }

        // Stable: equal dates keep file-name order
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        Ok(posts)
    }

    /// Find one post by slug (re-runs the full load)
    pub fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        Ok(self
            .load_all_posts()?
            .into_iter()
            .find(|post| post.slug == slug))
    }

    /// Every slug, newest first, for static page generation
    pub fn static_paths(&self) -> Result<Vec<String>, ContentError> {
        Ok(self
            .load_all_posts()?
            .into_iter()
            .map(|post| post.slug)
            .collect())
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path) -> Result<Post, ContentError> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let (fm, body) = FrontMatter::parse(&content)
            .map_err(|source| ContentError::FrontMatter {
                path: path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| ContentError::MissingFrontMatter {
                path: path.to_path_buf(),
            })?;

        let required = |value: Option<String>, field: &'static str| {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ContentError::MissingField {
                    path: path.to_path_buf(),
                    field,
                })
        };

        let published_at = match fm.published_at.as_deref() {
            None => {
                return Err(ContentError::MissingField {
                    path: path.to_path_buf(),
                    field: "publishedAt",
                })
            }
            Some(raw) => fm.parse_published().ok_or_else(|| ContentError::InvalidDate {
                path: path.to_path_buf(),
                value: raw.to_string(),
            })?,
        };
        let updated_at = fm.parse_updated();

        Ok(Post {
            slug: required(fm.slug, "slug")?,
            title: required(fm.title, "title")?,
            description: required(fm.description, "description")?,
            author: required(fm.author, "author")?,
            category: required(fm.category, "category")?,
            published_at,
            updated_at,
            reading_time: reading_time(body, self.words_per_minute),
            body: body.to_string(),
            tags: fm
                .tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            featured: fm.featured,
            image_url: fm.image_url,
            source: path.to_path_buf(),
        })
    }
}

/// Count posts per tag, most used first (ties keep first-seen order)
pub fn tag_counts(posts: &[Post]) -> Vec<(String, usize)> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    sorted_counts(counts)
}

/// Count posts per category, most used first
pub fn category_counts(posts: &[Post]) -> Vec<(String, usize)> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for post in posts {
        *counts.entry(post.category.clone()).or_insert(0) += 1;
    }
    sorted_counts(counts)
}

fn sorted_counts(counts: IndexMap<String, usize>) -> Vec<(String, usize)> {
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
