//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::{commands, server, Site};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A personal portfolio and blog: markdown posts, catalog pages and a contact form", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new blog post
    New {
        /// Title of the new post
        title: String,

        /// Slug to use instead of one derived from the title
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Serve the site
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Write every page to the public folder
    #[command(alias = "b")]
    Build,

    /// Validate content, catalog and environment
    Check,

    /// Delete the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, tag, category, catalog, route)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,tower_http=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized new site in {:?}", target_dir);
        }

        Commands::New { title, slug } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Creating new post: {}", title);
            commands::new::create_post(&site, &title, slug.as_deref())?;
        }

        Commands::Serve { port, ip } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            server::start(&site, &ip, port).await?;
        }

        Commands::Build => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Building static site...");
            commands::build::run(&site)?;
            println!("Built successfully!");
        }

        Commands::Check => {
            let site = Site::new(&base_dir)?;
            commands::check::run(&site)?;
        }

        Commands::Clean => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            commands::clean::run(&site)?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = Site::new(&base_dir)?;
            commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
