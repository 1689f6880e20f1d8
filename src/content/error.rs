//! Content pipeline errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading posts from the content directory
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("cannot read content directory {path:?}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} has no front-matter block")]
    MissingFrontMatter { path: PathBuf },

    #[error("invalid front-matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{path:?} is missing required front-matter field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("{path:?} has an unparseable publishedAt value: {value}")]
    InvalidDate { path: PathBuf, value: String },

    #[error("slug `{slug}` is used by both {first:?} and {second:?}")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}
