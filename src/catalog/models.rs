//! Catalog entities read from the data directory

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::filter::Filterable;

/// A portfolio project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    pub repo_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
}

/// Reading status of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Reading,
    Finished,
    Wishlist,
}

impl BookStatus {
    pub fn label(self) -> &'static str {
        match self {
            BookStatus::Reading => "Currently reading",
            BookStatus::Finished => "Finished",
            BookStatus::Wishlist => "On the list",
        }
    }
}

/// A book on the reading list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub status: BookStatus,
    pub rating: Option<u8>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: Option<String>,
    pub cover_url: Option<String>,
}

/// A tool or piece of software in daily use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: Option<String>,
}

/// Talks, events, volunteering and other activities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: Option<String>,
}

/// Kind of media appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Podcast,
    Talk,
    Article,
    Interview,
}

impl MediaKind {
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Video => "Video",
            MediaKind::Podcast => "Podcast",
            MediaKind::Talk => "Talk",
            MediaKind::Article => "Article",
            MediaKind::Interview => "Interview",
        }
    }
}

/// A video, podcast, talk or article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    pub kind: MediaKind,
    pub description: Option<String>,
    pub url: String,
    pub published_on: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One technology in the stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechItem {
    pub name: String,
    pub level: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A group of technologies (languages, frameworks, infrastructure...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechCategory {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<TechItem>,
}

/// Resume section an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeSection {
    Experience,
    Education,
    Certification,
    Volunteering,
}

impl ResumeSection {
    pub fn label(self) -> &'static str {
        match self {
            ResumeSection::Experience => "Experience",
            ResumeSection::Education => "Education",
            ResumeSection::Certification => "Certifications",
            ResumeSection::Volunteering => "Volunteering",
        }
    }
}

/// A resume line: a job, a degree, a certificate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeEntry {
    pub id: String,
    pub section: ResumeSection,
    pub title: String,
    pub organization: String,
    pub location: Option<String>,
    pub start: String,
    /// `None` means ongoing
    pub end: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: Option<String>,
}

impl ResumeEntry {
    /// "2019 – 2022" or "2022 – Present"
    pub fn period(&self) -> String {
        format!(
            "{} – {}",
            self.start,
            self.end.as_deref().unwrap_or("Present")
        )
    }
}

macro_rules! filterable {
    ($($ty:ty => $title:ident),* $(,)?) => {
        $(
            impl Filterable for $ty {
                fn title(&self) -> &str {
                    &self.$title
                }

                fn has_tag(&self, tag: &str) -> bool {
                    self.tags.iter().any(|t| t == tag)
                }
            }
        )*
    };
}

filterable! {
    Project => title,
    Book => title,
    Tool => name,
    Activity => title,
    MediaItem => title,
    TechItem => name,
    ResumeEntry => title,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_book_and_media() {
        let yaml = r#"
- id: sicp
  title: Structure and Interpretation of Computer Programs
  author: Abelson & Sussman
  status: finished
  rating: 5
  tags: [lisp, classics]
"#;
        let books: Vec<Book> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(books[0].status, BookStatus::Finished);
        assert_eq!(books[0].rating, Some(5));
        assert!(books[0].has_tag("lisp"));

        let yaml = r#"
- id: rustconf
  title: Ownership in practice
  kind: talk
  url: https://example.com/talk
  published_on: 2023-09-12
"#;
        let media: Vec<MediaItem> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(media[0].kind, MediaKind::Talk);
        assert_eq!(
            media[0].published_on,
            NaiveDate::from_ymd_opt(2023, 9, 12)
        );
        assert!(media[0].tags.is_empty());
    }

    #[test]
    fn test_resume_period() {
        let entry = ResumeEntry {
            id: "acme".to_string(),
            section: ResumeSection::Experience,
            title: "Engineer".to_string(),
            organization: "Acme".to_string(),
            location: None,
            start: "2021".to_string(),
            end: None,
            summary: None,
            highlights: Vec::new(),
            tags: Vec::new(),
            url: None,
        };
        assert_eq!(entry.period(), "2021 – Present");
    }
}
