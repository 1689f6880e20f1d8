//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Create a new post from `title`, returning its path
pub fn create_post(site: &Site, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(slug) => slug::slugify(slug),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from {:?}", title);
    }

    fs::create_dir_all(&site.content_dir)?;
    let file_path = site.content_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Utc::now();
    let content = format!(
        "---\nslug: {slug}\ntitle: {title}\ndescription: {title}\nauthor: {author}\npublishedAt: {date}\ncategory: {category}\ntags: []\n---\n\n",
        slug = slug,
        title = yaml_string(title),
        author = yaml_string(&site.config.author),
        date = now.format("%Y-%m-%dT%H:%M:%SZ"),
        category = yaml_string(&site.config.default_category),
    );

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Double-quoted YAML scalar
fn yaml_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;
    use tempfile::TempDir;

    #[test]
    fn test_create_post() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = create_post(&site, "Hello: \"World\"", None).unwrap();
        assert_eq!(path, site.content_dir.join("hello-world.md"));

        let content = fs::read_to_string(&path).unwrap();
        let (fm, _) = FrontMatter::parse(&content).unwrap().unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello: \"World\""));
        assert_eq!(fm.slug.as_deref(), Some("hello-world"));
        assert!(fm.parse_published().is_some());
        // The scaffold is a complete post
        assert_eq!(site.loader().load_all_posts().unwrap().len(), 1);

        assert!(create_post(&site, "Hello World", None).is_err());
    }

    #[test]
    fn test_create_post_with_explicit_slug() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let path = create_post(&site, "Anything", Some("My Slug")).unwrap();
        assert!(path.ends_with("my-slug.md"));
    }

    #[test]
    fn test_empty_slug_is_rejected() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(create_post(&site, "!!!", None).is_err());
    }
}
