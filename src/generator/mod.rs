//! Generator module - writes every page of the site to the public directory

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::catalog::{Catalog, CatalogKind, ListingFilter};
use crate::config::SiteConfig;
use crate::content::loader::tag_counts;
use crate::content::Post;
use crate::helpers::{
    absolutize_urls, encode_segment, escape_xml, full_url_for, strip_invalid_xml_chars,
};
use crate::pages::{Pages, View};
use crate::theme::ThemeMode;
use crate::Site;

/// Routes of the site that are not blog posts or tag pages
pub fn page_routes() -> Vec<String> {
    let mut routes: Vec<String> = ["/", "/about", "/blog", "/contact", "/stack", "/resume"]
        .iter()
        .map(|r| r.to_string())
        .collect();
    routes.extend(CatalogKind::ALL.iter().map(|kind| kind.path()));
    routes
}

/// Whether a tag can be used as a single directory name
fn is_safe_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag != "."
        && tag != ".."
        && !tag.contains(['/', '\\'])
        && !tag.chars().any(|c| c.is_control())
}

/// Static site generator
pub struct Generator {
    public_dir: PathBuf,
    static_dir: PathBuf,
    pages: Pages,
    catalog: Catalog,
}

impl Generator {
    /// Create a generator for `site`, loading its catalog
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            public_dir: site.public_dir.clone(),
            static_dir: site.static_dir.clone(),
            pages: Pages::new(site.config.clone())?,
            catalog: site.catalog()?,
        })
    }

    fn config(&self) -> &SiteConfig {
        self.pages.config()
    }

    /// Render the whole site; `posts` must be newest first.
    /// Returns the number of files written.
    pub fn generate(&self, posts: &[Post]) -> Result<usize> {
        fs::create_dir_all(&self.public_dir)?;

        let mut written = self.copy_static_assets()?;
        written += self.generate_pages(posts)?;
        written += self.generate_post_pages(posts)?;
        written += self.generate_tag_pages(posts)?;

        self.write_file("atom.xml", &atom_feed(&self.pages, posts))?;
        self.write_file("sitemap.xml", &sitemap(self.config(), posts))?;
        self.write_file("robots.txt", &robots(self.config()))?;
        written += 3;

        Ok(written)
    }

    /// Home, about, contact, listings and the 404 page
    fn generate_pages(&self, posts: &[Post]) -> Result<usize> {
        let no_filter = ListingFilter::default();

        self.write_page("/", &self.pages.home(view("/"), posts, &self.catalog)?)?;
        self.write_page("/about", &self.pages.about(view("/about"), &self.catalog)?)?;
        self.write_page("/contact", &self.pages.contact(view("/contact"))?)?;
        self.write_page("/blog", &self.pages.blog(view("/blog"), posts, &no_filter)?)?;
        self.write_page(
            "/stack",
            &self.pages.stack(view("/stack"), &self.catalog, &no_filter)?,
        )?;
        self.write_page("/resume", &self.pages.resume(view("/resume"), &self.catalog)?)?;
        let mut count = 6;

        for kind in CatalogKind::ALL {
            let path = kind.path();
            let html = self
                .pages
                .catalog(view(&path), kind, &self.catalog, &no_filter)?;
            self.write_page(&path, &html)?;
            count += 1;
        }

        self.write_file("404.html", &self.pages.not_found(view("/404"))?)?;
        count += 1;

        tracing::info!("Generated {} pages", count);
        Ok(count)
    }

    fn generate_post_pages(&self, posts: &[Post]) -> Result<usize> {
        for post in posts {
            let path = format!("/blog/{}", post.slug);
            let html = self.pages.post(view(&path), posts, post)?;
            self.write_page(&path, &html)?;
        }

        tracing::info!("Generated {} posts", posts.len());
        Ok(posts.len())
    }

    fn generate_tag_pages(&self, posts: &[Post]) -> Result<usize> {
        let mut count = 0;
        for (tag, _) in tag_counts(posts) {
            if !is_safe_tag(&tag) {
                tracing::warn!("Skipping tag page for {:?}: not a valid directory name", tag);
                continue;
            }

            let path = format!("/blog/tags/{}", tag);
            let html = self.pages.tag(view(&path), posts, &tag)?;
            self.write_page(&path, &html)?;
            count += 1;
        }

        tracing::info!("Generated {} tag pages", count);
        Ok(count)
    }

    /// Write a route as `<route>/index.html`
    fn write_page(&self, route: &str, html: &str) -> Result<()> {
        let clean_path = route.trim_matches('/');
        let output_path = if clean_path.is_empty() {
            self.public_dir.join("index.html")
        } else {
            self.public_dir.join(clean_path).join("index.html")
        };
        write(&output_path, html)
    }

    fn write_file(&self, name: &str, content: &str) -> Result<()> {
        write(&self.public_dir.join(name), content)
    }

    /// Copy the static directory to `public/assets`
    fn copy_static_assets(&self) -> Result<usize> {
        if !self.static_dir.is_dir() {
            tracing::debug!("No static directory at {:?}", self.static_dir);
            return Ok(0);
        }

        let assets_dir = self.public_dir.join("assets");
        let mut copied = 0;
        for entry in WalkDir::new(&self.static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(&self.static_dir)?;
            let dest = assets_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
            copied += 1;
        }

        tracing::info!("Copied {} static assets", copied);
        Ok(copied)
    }
}

/// Static pages are always rendered light; the client script applies the cookie
fn view(path: &str) -> View<'_> {
    View::new(path, ThemeMode::Light)
}

fn write(output_path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(output_path, content)
        .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
    tracing::debug!("Generated: {:?}", output_path);
    Ok(())
}

/// Atom feed of the newest `feed_limit` posts
pub fn atom_feed(pages: &Pages, posts: &[Post]) -> String {
    let config = pages.config();
    let home = full_url_for(config, "/");
    let updated = posts
        .first()
        .map(|p| p.updated_at.unwrap_or(p.published_at))
        .unwrap_or_else(chrono::Utc::now);

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
    feed.push('\n');
    feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
    feed.push_str(&format!(
        "  <subtitle>{}</subtitle>\n",
        escape_xml(&config.description)
    ));
    feed.push_str(&format!(
        "  <link href=\"{}\" rel=\"self\"/>\n",
        escape_xml(&full_url_for(config, "/atom.xml"))
    ));
    feed.push_str(&format!("  <link href=\"{}\"/>\n", escape_xml(&home)));
    feed.push_str(&format!("  <updated>{}</updated>\n", updated.to_rfc3339()));
    feed.push_str(&format!("  <id>{}</id>\n", escape_xml(&home)));
    feed.push_str(&format!(
        "  <author><name>{}</name></author>\n",
        escape_xml(&config.author)
    ));

    for post in posts.iter().take(config.feed_limit) {
        let url = escape_xml(&full_url_for(config, &format!("/blog/{}", post.slug)));
        feed.push_str("  <entry>\n");
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
        feed.push_str(&format!("    <link href=\"{}\"/>\n", url));
        feed.push_str(&format!("    <id>{}</id>\n", url));
        feed.push_str(&format!(
            "    <published>{}</published>\n",
            post.published_at.to_rfc3339()
        ));
        feed.push_str(&format!(
            "    <updated>{}</updated>\n",
            post.updated_at.unwrap_or(post.published_at).to_rfc3339()
        ));
        feed.push_str(&format!(
            "    <summary>{}</summary>\n",
            escape_xml(&post.description)
        ));
        for tag in &post.tags {
            feed.push_str(&format!("    <category term=\"{}\"/>\n", escape_xml(tag)));
        }

        let content = absolutize_urls(&pages.post_html(post, ThemeMode::Light), &config.url);
        // CDATA cannot contain its own terminator
        let content = strip_invalid_xml_chars(&content).replace("]]>", "]]]]><![CDATA[>");
        feed.push_str(&format!(
            "    <content type=\"html\"><![CDATA[{}]]></content>\n",
            content
        ));
        feed.push_str("  </entry>\n");
    }

    feed.push_str("</feed>\n");
    feed
}

/// `sitemap.xml` listing every page, post and tag page
pub fn sitemap(config: &SiteConfig, posts: &[Post]) -> String {
    let mut urls: Vec<(String, Option<String>)> = page_routes()
        .into_iter()
        .map(|route| (full_url_for(config, &route), None))
        .collect();

    urls.extend(posts.iter().map(|post| {
        (
            full_url_for(config, &format!("/blog/{}", post.slug)),
            Some(
                post.updated_at
                    .unwrap_or(post.published_at)
                    .format("%Y-%m-%d")
                    .to_string(),
            ),
        )
    }));

    urls.extend(
        tag_counts(posts)
            .into_iter()
            .filter(|(tag, _)| is_safe_tag(tag))
            .map(|(tag, _)| {
                let path = format!("/blog/tags/{}", encode_segment(&tag));
                (full_url_for(config, &path), None)
            }),
    );

    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');
    for (loc, lastmod) in urls {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&loc)));
        if let Some(lastmod) = lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
        }
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// `robots.txt` allowing everything and pointing at the sitemap
pub fn robots(config: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /api/\n\nSitemap: {}\n",
        full_url_for(config, "/sitemap.xml")
    )
}
