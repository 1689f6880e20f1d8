//! Catalog module - projects, books, tools and other static listings
//!
//! Every listing lives in one YAML file under the data directory and is
//! loaded once at startup. A missing file is an empty listing.

pub mod filter;
mod models;

pub use filter::{collect_tags, Filterable, ListingFilter};
pub use models::{
    Activity, Book, BookStatus, MediaItem, MediaKind, Project, ResumeEntry, ResumeSection,
    TechCategory, TechItem, Tool,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid data in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("duplicate id '{id}' in {path}")]
    DuplicateId { id: String, path: PathBuf },
}

/// All static listings of the site
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub projects: Vec<Project>,
    pub books: Vec<Book>,
    pub tools: Vec<Tool>,
    pub activities: Vec<Activity>,
    pub media: Vec<MediaItem>,
    pub stack: Vec<TechCategory>,
    pub resume: Vec<ResumeEntry>,
}

impl Catalog {
    /// Load every listing from `data_dir`
    pub fn load(data_dir: &Path) -> Result<Self, CatalogError> {
        let catalog = Self {
            projects: load_listing(data_dir, "projects.yml", |p: &Project| &p.id)?,
            books: load_listing(data_dir, "books.yml", |b: &Book| &b.id)?,
            tools: load_listing(data_dir, "tools.yml", |t: &Tool| &t.id)?,
            activities: load_listing(data_dir, "activities.yml", |a: &Activity| &a.id)?,
            media: load_listing(data_dir, "media.yml", |m: &MediaItem| &m.id)?,
            stack: load_listing(data_dir, "stack.yml", |c: &TechCategory| &c.key)?,
            resume: load_listing(data_dir, "resume.yml", |r: &ResumeEntry| &r.id)?,
        };

        tracing::debug!(
            "Loaded catalog: {} projects, {} books, {} tools, {} activities, {} media, {} stack groups, {} resume entries",
            catalog.projects.len(),
            catalog.books.len(),
            catalog.tools.len(),
            catalog.activities.len(),
            catalog.media.len(),
            catalog.stack.len(),
            catalog.resume.len()
        );

        Ok(catalog)
    }

    /// Cards of the projects flagged `featured`, for the home page
    pub fn featured_project_cards(&self) -> Vec<Card> {
        self.projects
            .iter()
            .filter(|p| p.featured)
            .map(ToCard::to_card)
            .collect()
    }

    /// Number of entries per listing, for `folio list catalog`
    pub fn summary(&self) -> Vec<(CatalogKind, usize)> {
        CatalogKind::ALL
            .iter()
            .map(|kind| (*kind, kind.len(self)))
            .collect()
    }
}

fn load_listing<T, F>(data_dir: &Path, file: &str, id: F) -> Result<Vec<T>, CatalogError>
where
    T: DeserializeOwned,
    F: Fn(&T) -> &String,
{
    let path = data_dir.join(file);
    if !path.exists() {
        tracing::debug!("No {} in {:?}, listing is empty", file, data_dir);
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path).map_err(|source| CatalogError::Read {
        path: path.clone(),
        source,
    })?;

    // An empty file is an empty listing rather than a null document
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let items: Vec<T> = serde_yaml::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.clone(),
        source,
    })?;

    let mut seen = HashSet::new();
    for item in &items {
        let key = id(item);
        if !seen.insert(key.as_str()) {
            return Err(CatalogError::DuplicateId {
                id: key.clone(),
                path,
            });
        }
    }

    Ok(items)
}

/// The card-style listing pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Projects,
    Books,
    Tools,
    Activities,
    Media,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 5] = [
        CatalogKind::Projects,
        CatalogKind::Books,
        CatalogKind::Tools,
        CatalogKind::Activities,
        CatalogKind::Media,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CatalogKind::Projects => "projects",
            CatalogKind::Books => "books",
            CatalogKind::Tools => "tools",
            CatalogKind::Activities => "activities",
            CatalogKind::Media => "media",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CatalogKind::Projects => "Projects",
            CatalogKind::Books => "Books",
            CatalogKind::Tools => "Tools",
            CatalogKind::Activities => "Activities",
            CatalogKind::Media => "Media",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CatalogKind::Projects => "Things I have built, shipped or contributed to.",
            CatalogKind::Books => "What I am reading and what I recommend.",
            CatalogKind::Tools => "Software and hardware I use every day.",
            CatalogKind::Activities => "Talks, events and community work.",
            CatalogKind::Media => "Videos, podcasts and interviews.",
        }
    }

    /// Route path of the listing page
    pub fn path(self) -> String {
        format!("/{}", self.as_str())
    }

    fn len(self, catalog: &Catalog) -> usize {
        match self {
            CatalogKind::Projects => catalog.projects.len(),
            CatalogKind::Books => catalog.books.len(),
            CatalogKind::Tools => catalog.tools.len(),
            CatalogKind::Activities => catalog.activities.len(),
            CatalogKind::Media => catalog.media.len(),
        }
    }

    /// Filtered cards of this listing, in catalog order
    pub fn cards(self, catalog: &Catalog, filter: &ListingFilter) -> Vec<Card> {
        match self {
            CatalogKind::Projects => cards_of(&catalog.projects, filter),
            CatalogKind::Books => cards_of(&catalog.books, filter),
            CatalogKind::Tools => cards_of(&catalog.tools, filter),
            CatalogKind::Activities => cards_of(&catalog.activities, filter),
            CatalogKind::Media => cards_of(&catalog.media, filter),
        }
    }

    /// Every tag used by the listing, first-seen order
    pub fn tags(self, catalog: &Catalog) -> Vec<String> {
        fn tags_of<T: ToCard>(items: &[T]) -> Vec<String> {
            collect_tags(items.iter().flat_map(|i| i.tags().iter()))
        }
        match self {
            CatalogKind::Projects => tags_of(&catalog.projects),
            CatalogKind::Books => tags_of(&catalog.books),
            CatalogKind::Tools => tags_of(&catalog.tools),
            CatalogKind::Activities => tags_of(&catalog.activities),
            CatalogKind::Media => tags_of(&catalog.media),
        }
    }
}

/// Presentation of any catalog entry; one partial renders them all
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub badge: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub links: Vec<CardLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardLink {
    pub label: String,
    pub url: String,
}

impl CardLink {
    fn new(label: &str, url: &str) -> Self {
        Self {
            label: label.to_string(),
            url: url.to_string(),
        }
    }
}

trait ToCard: Filterable {
    fn tags(&self) -> &[String];

    fn to_card(&self) -> Card;
}

fn cards_of<T: ToCard>(items: &[T], filter: &ListingFilter) -> Vec<Card> {
    filter.apply(items).into_iter().map(ToCard::to_card).collect()
}

impl ToCard for Project {
    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn to_card(&self) -> Card {
        let mut links = Vec::new();
        if let Some(url) = &self.live_url {
            links.push(CardLink::new("Live", url));
        }
        if let Some(url) = &self.repo_url {
            links.push(CardLink::new("Source", url));
        }
        Card {
            title: self.title.clone(),
            subtitle: None,
            description: Some(self.description.clone()),
            badge: self.featured.then(|| "Featured".to_string()),
            image: self.image_url.clone(),
            tags: self.tags.clone(),
            links,
        }
    }
}

impl ToCard for Book {
    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn to_card(&self) -> Card {
        let badge = match self.rating {
            Some(rating) => format!("{} · {}/5", self.status.label(), rating.min(5)),
            None => self.status.label().to_string(),
        };
        Card {
            title: self.title.clone(),
            subtitle: Some(format!("by {}", self.author)),
            description: self.notes.clone(),
            badge: Some(badge),
            image: self.cover_url.clone(),
            tags: self.tags.clone(),
            links: self
                .url
                .iter()
                .map(|url| CardLink::new("Details", url))
                .collect(),
        }
    }
}

impl ToCard for Tool {
    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn to_card(&self) -> Card {
        Card {
            title: self.name.clone(),
            subtitle: Some(self.category.clone()),
            description: Some(self.description.clone()),
            badge: None,
            image: None,
            tags: self.tags.clone(),
            links: self
                .url
                .iter()
                .map(|url| CardLink::new("Website", url))
                .collect(),
        }
    }
}

impl ToCard for Activity {
    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn to_card(&self) -> Card {
        let subtitle = match (&self.date, &self.location) {
            (Some(date), Some(location)) => Some(format!("{} · {}", date.format("%b %Y"), location)),
            (Some(date), None) => Some(date.format("%b %Y").to_string()),
            (None, Some(location)) => Some(location.clone()),
            (None, None) => None,
        };
        Card {
            title: self.title.clone(),
            subtitle,
            description: Some(self.description.clone()),
            badge: None,
            image: None,
            tags: self.tags.clone(),
            links: self
                .url
                .iter()
                .map(|url| CardLink::new("More", url))
                .collect(),
        }
    }
}

impl ToCard for MediaItem {
    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn to_card(&self) -> Card {
        Card {
            title: self.title.clone(),
            subtitle: self
                .published_on
                .map(|date| date.format("%b %-d, %Y").to_string()),
            description: self.description.clone(),
            badge: Some(self.kind.label().to_string()),
            image: None,
            tags: self.tags.clone(),
            links: vec![CardLink::new("Open", &self.url)],
        }
    }
}
