//! Content module - blog posts, front-matter and markdown rendering

mod error;
mod frontmatter;
mod highlight;
pub mod loader;
pub mod markdown;
mod post;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use highlight::CodeHighlighter;
pub use loader::ContentLoader;
pub use markdown::{parse_blocks, table_of_contents, ContentBlock, Inline, TocEntry};
pub use post::{count_words, reading_time, Post, DEFAULT_WORDS_PER_MINUTE};
