//! folio: a personal portfolio and blog site
//!
//! Markdown posts with front-matter, YAML-backed catalog pages (projects,
//! books, tools...), a contact form forwarded to a transactional email
//! API, all rendered through Tera templates embedded in the binary. The
//! site can be served with axum or written out as static files.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod contact;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod pages;
pub mod server;
pub mod templates;
pub mod theme;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the site configuration file inside the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A site on disk: its configuration and resolved directories
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown posts
    pub content_dir: PathBuf,
    /// Catalog YAML files
    pub data_dir: PathBuf,
    /// Static assets served under /assets
    pub static_dir: PathBuf,
    /// Output of `folio build`
    pub public_dir: PathBuf,
}

impl Site {
    /// Open the site rooted at `base_dir`, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let data_dir = base_dir.join(&config.data_dir);
        let static_dir = base_dir.join(&config.static_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            data_dir,
            static_dir,
            public_dir,
        }
    }

    /// Loader over this site's content directory
    pub fn loader(&self) -> content::ContentLoader {
        content::ContentLoader::new(self)
    }

    /// Load the catalog from this site's data directory
    pub fn catalog(&self) -> Result<catalog::Catalog> {
        Ok(catalog::Catalog::load(&self.data_dir)?)
    }
}
