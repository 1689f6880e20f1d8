//! Pages module - builds view contexts and renders every page of the site
//!
//! The server and the static generator both render through [`Pages`], so a
//! page looks the same whether it is served or written to disk.

pub mod seo;

pub use seo::PageMeta;

use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;
use tera::Context;

use crate::catalog::{
    collect_tags, Card, Catalog, CatalogKind, ListingFilter, ResumeEntry,
    ResumeSection, TechItem,
};
use crate::config::SiteConfig;
use crate::contact::{Budget, ProjectType, Timeline};
use crate::content::loader::{category_counts, tag_counts};
use crate::content::{parse_blocks, table_of_contents, CodeHighlighter, Post};
use crate::helpers::{encode_segment, url_for};
use crate::templates::TemplateRenderer;
use crate::theme::ThemeMode;

/// Number of posts shown in the home page's "recent" list
const RECENT_POSTS: usize = 5;
const FEATURED_POSTS: usize = 3;

/// Per-request inputs of a view
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    /// Request path, without the query string
    pub path: &'a str,
    /// Raw query string, if any
    pub query: Option<&'a str>,
    pub theme: ThemeMode,
}

impl<'a> View<'a> {
    pub fn new(path: &'a str, theme: ThemeMode) -> Self {
        Self {
            path,
            query: None,
            theme,
        }
    }

    pub fn with_query(mut self, query: Option<&'a str>) -> Self {
        self.query = query.filter(|q| !q.is_empty());
        self
    }

    /// Path and query, as the theme toggle should return to it
    fn location(&self) -> String {
        match self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.to_string(),
        }
    }
}

/// Post as shown in listings and returned by `/api/posts`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub slug: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub published_at: String,
    pub reading_time: usize,
    pub category: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub image_url: Option<String>,
}

impl PostSummary {
    pub fn new(config: &SiteConfig, post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            url: url_for(config, &format!("/blog/{}", post.slug)),
            title: post.title.clone(),
            description: post.description.clone(),
            author: post.author.clone(),
            published_at: post.published_at.to_rfc3339(),
            reading_time: post.reading_time,
            category: post.category.clone(),
            tags: post.tags.iter().cloned().collect(),
            featured: post.featured,
            image_url: post.image_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct NavItem<'a> {
    name: &'a str,
    url: String,
    active: bool,
}

/// A selectable tag in a listing's filter bar
#[derive(Debug, Serialize)]
struct TagChip {
    name: String,
    count: Option<usize>,
    url: String,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct Choice {
    value: &'static str,
    label: &'static str,
}

#[derive(Debug, Serialize)]
struct StackGroup<'a> {
    key: &'a str,
    name: &'a str,
    description: Option<&'a str>,
    items: Vec<&'a TechItem>,
}

#[derive(Debug, Serialize)]
struct ResumeItem<'a> {
    #[serde(flatten)]
    entry: &'a ResumeEntry,
    period: String,
}

#[derive(Debug, Serialize)]
struct ResumeGroup<'a> {
    label: &'static str,
    entries: Vec<ResumeItem<'a>>,
}

/// Renders pages from posts, the catalog and the site configuration
pub struct Pages {
    config: SiteConfig,
    templates: TemplateRenderer,
    highlighter: CodeHighlighter,
}

impl Pages {
    pub fn new(config: SiteConfig) -> Result<Self> {
        let highlighter = CodeHighlighter::with_config(&config.highlight);
        Ok(Self {
            templates: TemplateRenderer::new()?,
            highlighter,
            config,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Context shared by every page: site, navigation, theme and meta
    fn base_context(&self, view: View<'_>, meta: &PageMeta) -> Context {
        let config = &self.config;
        let mut context = Context::new();
        context.insert("site", config);
        context.insert("nav", &self.nav(view.path));
        context.insert("theme", view.theme.as_str());
        context.insert("next_theme", view.theme.toggled().as_str());
        context.insert(
            "theme_toggle_url",
            &format!(
                "{}?next={}",
                url_for(config, "/theme/toggle"),
                encode_segment(&url_for(config, &view.location()))
            ),
        );
        context.insert("meta", meta);
        context.insert("current_path", view.path);
        context.insert("root", &url_for(config, ""));
        context.insert("current_year", &chrono::Utc::now().year());
        context
    }

    fn nav(&self, path: &str) -> Vec<NavItem<'_>> {
        self.config
            .menu
            .iter()
            .map(|item| NavItem {
                name: &item.name,
                url: url_for(&self.config, &item.path),
                active: if item.path == "/" {
                    path == "/"
                } else {
                    path == item.path || path.starts_with(&format!("{}/", item.path))
                },
            })
            .collect()
    }

    fn summaries<'p, I>(&self, posts: I) -> Vec<PostSummary>
    where
        I: IntoIterator<Item = &'p Post>,
    {
        posts
            .into_iter()
            .map(|p| PostSummary::new(&self.config, p))
            .collect()
    }

    /// Summaries of every post, for the JSON API
    pub fn post_summaries(&self, posts: &[Post]) -> Vec<PostSummary> {
        self.summaries(posts)
    }

    /// Rendered body of a post, without the page chrome
    pub fn post_html(&self, post: &Post, theme: ThemeMode) -> String {
        self.highlighter.render_html(&parse_blocks(&post.body), theme)
    }

    pub fn home(&self, view: View<'_>, posts: &[Post], catalog: &Catalog) -> Result<String> {
        let meta = PageMeta::new(&self.config, view.path, None, None);
        let mut context = self.base_context(view, &meta);

        let mut featured: Vec<&Post> = posts.iter().filter(|p| p.featured).collect();
        if featured.is_empty() {
            featured = posts.iter().collect();
        }
        featured.truncate(FEATURED_POSTS);

        context.insert("featured_posts", &self.summaries(featured));
        context.insert("recent_posts", &self.summaries(posts.iter().take(RECENT_POSTS)));
        context.insert("featured_projects", &catalog.featured_project_cards());
        self.templates.render("index.html", &context)
    }

    pub fn about(&self, view: View<'_>, catalog: &Catalog) -> Result<String> {
        let meta = PageMeta::new(&self.config, view.path, Some("About"), None);
        let mut context = self.base_context(view, &meta);

        let bio = parse_blocks(&self.config.bio);
        context.insert("bio_html", &self.highlighter.render_html(&bio, view.theme));
        context.insert("stack", &catalog.stack);
        self.templates.render("about.html", &context)
    }

    pub fn contact(&self, view: View<'_>) -> Result<String> {
        let meta = PageMeta::new(
            &self.config,
            view.path,
            Some("Contact"),
            Some("Get in touch about a project, a talk or anything else."),
        );
        let mut context = self.base_context(view, &meta);

        context.insert("limits", &self.config.contact);
        context.insert(
            "budgets",
            &choices(Budget::ALL.iter().map(|b| (b.as_str(), b.label()))),
        );
        context.insert(
            "timelines",
            &choices(Timeline::ALL.iter().map(|t| (t.as_str(), t.label()))),
        );
        context.insert(
            "project_types",
            &choices(ProjectType::ALL.iter().map(|p| (p.as_str(), p.label()))),
        );
        context.insert("endpoint", &url_for(&self.config, "/api/contact"));
        self.templates.render("contact.html", &context)
    }

    /// Blog listing narrowed by a search query and selected tags
    pub fn blog(&self, view: View<'_>, posts: &[Post], filter: &ListingFilter) -> Result<String> {
        let meta = PageMeta::new(&self.config, view.path, Some("Blog"), None);
        let mut context = self.base_context(view, &meta);

        let listing = filter.apply(posts);
        let base = url_for(&self.config, "/blog");
        let tags: Vec<TagChip> = tag_counts(posts)
            .into_iter()
            .map(|(name, count)| TagChip {
                url: format!("{}{}", base, filter.toggle_tag_query(&name)),
                selected: filter.is_selected(&name),
                count: Some(count),
                name,
            })
            .collect();

        context.insert("heading", "Blog");
        context.insert("posts", &self.summaries(listing));
        context.insert("total", &posts.len());
        context.insert("tags", &tags);
        context.insert("categories", &category_counts(posts));
        context.insert("filter", filter);
        context.insert("filter_action", &base);
        context.insert("clear_url", &base);
        self.templates.render("blog.html", &context)
    }

    /// All posts carrying `tag`
    pub fn tag(&self, view: View<'_>, posts: &[Post], tag: &str) -> Result<String> {
        let heading = format!("Posts tagged “{}”", tag);
        let meta = PageMeta::new(&self.config, view.path, Some(&heading), None);
        let mut context = self.base_context(view, &meta);

        let filter = ListingFilter::tag(tag);
        let listing = filter.apply(posts);
        context.insert("heading", &heading);
        context.insert("posts", &self.summaries(listing));
        context.insert("total", &posts.len());
        context.insert("tags", &Vec::<TagChip>::new());
        context.insert("categories", &Vec::<(String, usize)>::new());
        context.insert("filter", &ListingFilter::default());
        context.insert("filter_action", &url_for(&self.config, "/blog"));
        context.insert("clear_url", &url_for(&self.config, "/blog"));
        self.templates.render("blog.html", &context)
    }

    /// A single post; `posts` is the full newest-first list for neighbours
    pub fn post(&self, view: View<'_>, posts: &[Post], post: &Post) -> Result<String> {
        let meta = PageMeta::for_post(&self.config, post);
        let mut context = self.base_context(view, &meta);

        let blocks = parse_blocks(&post.body);
        context.insert("post", &PostSummary::new(&self.config, post));
        context.insert("updated_at", &post.updated_at.map(|d| d.to_rfc3339()));
        context.insert(
            "content_html",
            &self.highlighter.render_html(&blocks, view.theme),
        );
        context.insert("toc", &table_of_contents(&blocks));
        context.insert(
            "prev_post",
            &post.prev(posts).map(|p| PostSummary::new(&self.config, p)),
        );
        context.insert(
            "next_post",
            &post.next(posts).map(|p| PostSummary::new(&self.config, p)),
        );
        context.insert(
            "related_posts",
            &self.summaries(post.related(posts, self.config.related_posts)),
        );
        self.templates.render("post.html", &context)
    }

    /// One of the card-style catalog listings
    pub fn catalog(
        &self,
        view: View<'_>,
        kind: CatalogKind,
        catalog: &Catalog,
        filter: &ListingFilter,
    ) -> Result<String> {
        let meta = PageMeta::new(
            &self.config,
            view.path,
            Some(kind.title()),
            Some(kind.description()),
        );
        let mut context = self.base_context(view, &meta);

        let base = url_for(&self.config, &kind.path());
        let cards: Vec<Card> = kind.cards(catalog, filter);
        context.insert("heading", kind.title());
        context.insert("intro", kind.description());
        context.insert("cards", &cards);
        context.insert("tags", &self.chips(&base, kind.tags(catalog), filter));
        context.insert("filter", filter);
        context.insert("filter_action", &base);
        context.insert("clear_url", &base);
        self.templates.render("catalog.html", &context)
    }

    /// Tech stack grouped by category; the filter applies to items
    pub fn stack(&self, view: View<'_>, catalog: &Catalog, filter: &ListingFilter) -> Result<String> {
        let meta = PageMeta::new(
            &self.config,
            view.path,
            Some("Stack"),
            Some("Languages, frameworks and infrastructure I work with."),
        );
        let mut context = self.base_context(view, &meta);

        let groups: Vec<StackGroup> = catalog
            .stack
            .iter()
            .map(|category| StackGroup {
                key: &category.key,
                name: &category.name,
                description: category.description.as_deref(),
                items: filter.apply(&category.items),
            })
            .filter(|group| !group.items.is_empty())
            .collect();

        let all_tags = collect_tags(
            catalog
                .stack
                .iter()
                .flat_map(|c| c.items.iter())
                .flat_map(|i| i.tags.iter()),
        );

        let base = url_for(&self.config, "/stack");
        context.insert("groups", &groups);
        context.insert("tags", &self.chips(&base, all_tags, filter));
        context.insert("filter", filter);
        context.insert("filter_action", &base);
        context.insert("clear_url", &base);
        self.templates.render("stack.html", &context)
    }

    pub fn resume(&self, view: View<'_>, catalog: &Catalog) -> Result<String> {
        let meta = PageMeta::new(&self.config, view.path, Some("Resume"), None);
        let mut context = self.base_context(view, &meta);

        let sections = [
            ResumeSection::Experience,
            ResumeSection::Education,
            ResumeSection::Certification,
            ResumeSection::Volunteering,
        ];
        let groups: Vec<ResumeGroup> = sections
            .into_iter()
            .map(|section| ResumeGroup {
                label: section.label(),
                entries: catalog
                    .resume
                    .iter()
                    .filter(|entry| entry.section == section)
                    .map(|entry| ResumeItem {
                        period: entry.period(),
                        entry,
                    })
                    .collect(),
            })
            .filter(|group| !group.entries.is_empty())
            .collect();

        context.insert("groups", &groups);
        self.templates.render("resume.html", &context)
    }

    pub fn not_found(&self, view: View<'_>) -> Result<String> {
        let meta = PageMeta::new(&self.config, view.path, Some("Page not found"), None);
        let context = self.base_context(view, &meta);
        self.templates.render("not_found.html", &context)
    }

    fn chips(&self, base: &str, tags: Vec<String>, filter: &ListingFilter) -> Vec<TagChip> {
        tags.into_iter()
            .map(|name| TagChip {
                url: format!("{}{}", base, filter.toggle_tag_query(&name)),
                selected: filter.is_selected(&name),
                count: None,
                name,
            })
            .collect()
    }
}

fn choices<I>(values: I) -> Vec<Choice>
where
    I: Iterator<Item = (&'static str, &'static str)>,
{
    values.map(|(value, label)| Choice { value, label }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Project;
    use chrono::{TimeZone, Utc};

    fn post(slug: &str, day: u32, tags: &[&str], body: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: format!("Title {}", slug),
            description: format!("About {}", slug),
            body: body.to_string(),
            author: "Jane".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 1, day, 8, 0, 0).unwrap(),
            updated_at: None,
            reading_time: 1,
            category: "notes".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            featured: false,
            image_url: None,
            source: Default::default(),
        }
    }

    fn posts() -> Vec<Post> {
        vec![
            post("third", 3, &["rust"], "## Setup\n\nSome text.\n\n```rust\nfn main() {}\n```"),
            post("second", 2, &["web"], "Hello"),
            post("first", 1, &["rust", "web"], "Hello"),
        ]
    }

    fn catalog() -> Catalog {
        Catalog {
            projects: vec![Project {
                id: "folio".to_string(),
                title: "Folio <site>".to_string(),
                description: "This site".to_string(),
                tags: vec!["rust".to_string()],
                featured: true,
                repo_url: Some("https://github.com/jane/folio".to_string()),
                live_url: None,
                image_url: None,
            }],
            ..Default::default()
        }
    }

    fn pages() -> Pages {
        Pages::new(SiteConfig::default()).unwrap()
    }

    #[test]
    fn test_home_page() {
        let html = pages()
            .home(View::new("/", ThemeMode::Light), &posts(), &catalog())
            .unwrap();
        assert!(html.contains("Title third"));
        assert!(html.contains("Folio &lt;site&gt;"));
        assert!(html.contains("application/ld+json"));
        assert!(html.contains(r#"data-theme="light""#));
    }

    #[test]
    fn test_post_page() {
        let posts = posts();
        let html = pages()
            .post(View::new("/blog/second", ThemeMode::Dark), &posts, &posts[1])
            .unwrap();
        assert!(html.contains("Title second"));
        // Neighbours in both directions
        assert!(html.contains("/blog/third"));
        assert!(html.contains("/blog/first"));
        assert!(html.contains("BlogPosting"));
        assert!(html.contains(r#"data-theme="dark""#));
    }

    #[test]
    fn test_post_page_renders_code_and_toc() {
        let posts = posts();
        let html = pages()
            .post(View::new("/blog/third", ThemeMode::Light), &posts, &posts[0])
            .unwrap();
        assert!(html.contains(r##"href="#setup""##));
        assert!(html.contains(r#"id="setup""#));
        assert!(html.contains("highlight rust"));
    }

    #[test]
    fn test_blog_filter() {
        let filter = ListingFilter::from_query(None, Some("web"));
        let html = pages()
            .blog(View::new("/blog", ThemeMode::Light), &posts(), &filter)
            .unwrap();
        assert!(html.contains("Title second"));
        assert!(html.contains("Title first"));
        assert!(!html.contains("Title third"));
    }

    #[test]
    fn test_catalog_page() {
        let html = pages()
            .catalog(
                View::new("/projects", ThemeMode::Light),
                CatalogKind::Projects,
                &catalog(),
                &ListingFilter::default(),
            )
            .unwrap();
        assert!(html.contains("Folio &lt;site&gt;"));
        assert!(html.contains("https://github.com/jane/folio"));
    }

    #[test]
    fn test_contact_page_lists_choices() {
        let html = pages()
            .contact(View::new("/contact", ThemeMode::Light))
            .unwrap();
        assert!(html.contains(r#"value="5k-15k""#));
        assert!(html.contains(r#"name="projectType""#));
        assert!(html.contains("/api/contact"));
    }

    #[test]
    fn test_theme_toggle_returns_to_page() {
        let view = View::new("/blog", ThemeMode::Light).with_query(Some("tags=rust"));
        let html = pages().blog(view, &posts(), &ListingFilter::default()).unwrap();
        assert!(html.contains("/theme/toggle?next=%2Fblog%3Ftags%3Drust"));
    }

    #[test]
    fn test_not_found_page() {
        let html = pages()
            .not_found(View::new("/nope", ThemeMode::Light))
            .unwrap();
        assert!(html.contains("Page not found"));
    }

    #[test]
    fn test_nav_marks_active_section() {
        let pages = pages();
        let nav = pages.nav("/blog/hello");
        let active: Vec<&str> = nav.iter().filter(|n| n.active).map(|n| n.name).collect();
        assert_eq!(active, vec!["Blog"]);
    }
}
