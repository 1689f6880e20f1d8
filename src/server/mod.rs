//! HTTP server - page routes, the contact API and security headers

mod contact;
mod error;
mod handlers;
mod security;

pub use error::AppError;
pub use security::security_headers_for;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::catalog::{Catalog, CatalogKind};
use crate::config::EmailConfig;
use crate::contact::{EmailSender, ResendClient};
use crate::content::Post;
use crate::pages::Pages;
use crate::Site;
use handlers::{ListingQuery, PageRequest};

/// Read-only state shared by every request
pub struct AppState {
    pub site: Site,
    pub catalog: Catalog,
    pub pages: Pages,
    pub mailer: Arc<dyn EmailSender>,
    /// Sender address of contact notifications
    pub email_from: String,
    /// Recipient of contact notifications
    pub email_to: String,
}

impl AppState {
    pub fn new(
        site: Site,
        catalog: Catalog,
        mailer: Arc<dyn EmailSender>,
        email_from: String,
        email_to: String,
    ) -> Result<Self> {
        let pages = Pages::new(site.config.clone())?;
        Ok(Self {
            site,
            catalog,
            pages,
            mailer,
            email_from,
            email_to,
        })
    }

    /// Re-read every post from disk
    async fn load_posts(&self) -> Result<Vec<Post>, AppError> {
        let loader = self.site.loader();
        let posts = tokio::task::spawn_blocking(move || loader.load_all_posts())
            .await
            .map_err(|e| AppError::Internal(e.into()))??;
        Ok(posts)
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let security = Arc::new(state.site.config.security.clone());
    let assets = ServeDir::new(&state.site.static_dir);

    let mut router = Router::new()
        .route("/", get(handlers::home))
        .route("/about", get(handlers::about))
        .route("/contact", get(handlers::contact))
        .route("/blog", get(handlers::blog))
        .route("/blog/:slug", get(handlers::post))
        .route("/blog/tags/:tag", get(handlers::tag))
        .route("/stack", get(handlers::stack))
        .route("/resume", get(handlers::resume))
        .route("/theme/toggle", get(handlers::toggle_theme))
        .route("/api/contact", post(contact::submit))
        .route("/api/posts", get(handlers::api_posts))
        .route("/api/posts/:slug", get(handlers::api_post))
        .route("/atom.xml", get(handlers::atom))
        .route("/sitemap.xml", get(handlers::sitemap))
        .route("/robots.txt", get(handlers::robots));

    for kind in CatalogKind::ALL {
        router = router.route(
            &kind.path(),
            get(
                move |state: State<Arc<AppState>>,
                      page: PageRequest,
                      query: Query<ListingQuery>| {
                    handlers::catalog(kind, state, page, query)
                },
            ),
        );
    }

    router
        .nest_service("/assets", assets)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            security,
            security::security_headers,
        ))
        .layer(TraceLayer::new_for_http())
}

/// Start the server on `ip:port`
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    // Fail before binding when anything the site needs is missing
    let email = EmailConfig::from_env()?;
    let catalog = site.catalog()?;
    let posts = site.loader().load_all_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    let mailer = Arc::new(ResendClient::new(&email)?);
    let state = Arc::new(AppState::new(
        site.clone(),
        catalog,
        mailer,
        email.from,
        email.to,
    )?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
