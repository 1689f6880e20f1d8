//! List site content

use anyhow::Result;

use crate::content::loader::{category_counts, tag_counts};
use crate::generator::page_routes;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let loader = site.loader();

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_all_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]{}",
                    post.published_at.format("%Y-%m-%d"),
                    post.title,
                    post.source.display(),
                    if post.featured { " *" } else { "" }
                );
            }
        }
        "tag" | "tags" => {
            let tags = tag_counts(&loader.load_all_posts()?);
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "category" | "categories" => {
            let categories = category_counts(&loader.load_all_posts()?);
            println!("Categories ({}):", categories.len());
            for (category, count) in categories {
                println!("  {} ({})", category, count);
            }
        }
        "catalog" => {
            let catalog = site.catalog()?;
            println!("Catalog:");
            for (kind, count) in catalog.summary() {
                println!("  {} ({})", kind.title(), count);
            }
            println!("  Stack groups ({})", catalog.stack.len());
            println!("  Resume entries ({})", catalog.resume.len());
        }
        "route" | "routes" => {
            let mut routes = page_routes();
            routes.extend(
                loader
                    .static_paths()?
                    .into_iter()
                    .map(|slug| format!("/blog/{}", slug)),
            );
            println!("Routes ({}):", routes.len());
            for route in routes {
                println!("  {}", route);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, category, catalog, route",
                content_type
            );
        }
    }

    Ok(())
}
