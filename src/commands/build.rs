//! Build the static site

use anyhow::Result;

use crate::generator::Generator;
use crate::Site;

/// Render every page into the public directory
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let posts = site.loader().load_all_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    let generator = Generator::new(site)?;
    let written = generator.generate(&posts)?;

    tracing::info!(
        "Wrote {} files to {:?} in {:?}",
        written,
        site.public_dir,
        start.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::init_site;
    use tempfile::TempDir;

    #[test]
    fn test_build_fresh_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        let site = Site::new(dir.path()).unwrap();

        run(&site).unwrap();
        assert!(site.public_dir.join("index.html").exists());
        assert!(site.public_dir.join("atom.xml").exists());
        assert!(site.public_dir.join("404.html").exists());
    }
}
