//! Page handlers

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{header, request::Parts, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;

use super::{AppError, AppState};
use crate::catalog::{CatalogKind, ListingFilter};
use crate::content::{parse_blocks, Post};
use crate::generator;
use crate::helpers::is_local_path;
use crate::pages::{Pages, PostSummary, View};
use crate::theme::ThemeMode;

/// Path, query string and theme of a page request
pub struct PageRequest {
    path: String,
    query: Option<String>,
    theme: ThemeMode,
}

impl PageRequest {
    fn view(&self) -> View<'_> {
        View::new(&self.path, self.theme).with_query(self.query.as_deref())
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for PageRequest {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let cookie = parts
            .headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok());

        Ok(Self {
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            theme: ThemeMode::from_cookie_header(cookie),
        })
    }
}

/// `?q=<text>&tags=<a>,<b>`
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    q: Option<String>,
    tags: Option<String>,
}

impl ListingQuery {
    fn filter(&self) -> ListingFilter {
        ListingFilter::from_query(self.q.as_deref(), self.tags.as_deref())
    }
}

impl AppState {
    /// Turn a render result into a response, using the 404 page for
    /// [`AppError::NotFound`]
    fn respond(&self, page: &PageRequest, result: Result<String, AppError>) -> Response {
        match result {
            Ok(html) => Html(html).into_response(),
            Err(AppError::NotFound) => self.not_found_page(page),
            Err(err) => err.into_response(),
        }
    }

    fn not_found_page(&self, page: &PageRequest) -> Response {
        match self.pages.not_found(page.view()) {
            Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
            Err(err) => {
                tracing::error!("Failed to render the 404 page: {:#}", err);
                AppError::NotFound.into_response()
            }
        }
    }

    /// Load the posts and render a page from them
    async fn with_posts<F>(&self, page: &PageRequest, render: F) -> Response
    where
        F: FnOnce(&Pages, View<'_>, &[Post]) -> Result<String, AppError> + Send,
    {
        let result = match self.load_posts().await {
            Ok(posts) => render(&self.pages, page.view(), &posts),
            Err(err) => Err(err),
        };
        self.respond(page, result)
    }
}

pub async fn home(State(state): State<Arc<AppState>>, page: PageRequest) -> Response {
    state
        .with_posts(&page, |pages, view, posts| {
            Ok(pages.home(view, posts, &state.catalog)?)
        })
        .await
}

pub async fn about(State(state): State<Arc<AppState>>, page: PageRequest) -> Response {
    let result = state.pages.about(page.view(), &state.catalog);
    state.respond(&page, result.map_err(AppError::from))
}

pub async fn contact(State(state): State<Arc<AppState>>, page: PageRequest) -> Response {
    let result = state.pages.contact(page.view());
    state.respond(&page, result.map_err(AppError::from))
}

pub async fn blog(
    State(state): State<Arc<AppState>>,
    page: PageRequest,
    Query(query): Query<ListingQuery>,
) -> Response {
    let filter = query.filter();
    state
        .with_posts(&page, |pages, view, posts| {
            Ok(pages.blog(view, posts, &filter)?)
        })
        .await
}

pub async fn post(
    State(state): State<Arc<AppState>>,
    page: PageRequest,
    Path(slug): Path<String>,
) -> Response {
    state
        .with_posts(&page, |pages, view, posts| {
            let post = posts
                .iter()
                .find(|p| p.slug == slug)
                .ok_or(AppError::NotFound)?;
            Ok(pages.post(view, posts, post)?)
        })
        .await
}

pub async fn tag(
    State(state): State<Arc<AppState>>,
    page: PageRequest,
    Path(tag): Path<String>,
) -> Response {
    state
        .with_posts(&page, |pages, view, posts| {
            if !posts.iter().any(|p| p.has_tag(&tag)) {
                return Err(AppError::NotFound);
            }
            Ok(pages.tag(view, posts, &tag)?)
        })
        .await
}

pub async fn catalog(
    kind: CatalogKind,
    State(state): State<Arc<AppState>>,
    page: PageRequest,
    Query(query): Query<ListingQuery>,
) -> Response {
    let result = state
        .pages
        .catalog(page.view(), kind, &state.catalog, &query.filter());
    state.respond(&page, result.map_err(AppError::from))
}

pub async fn stack(
    State(state): State<Arc<AppState>>,
    page: PageRequest,
    Query(query): Query<ListingQuery>,
) -> Response {
    let result = state
        .pages
        .stack(page.view(), &state.catalog, &query.filter());
    state.respond(&page, result.map_err(AppError::from))
}

pub async fn resume(State(state): State<Arc<AppState>>, page: PageRequest) -> Response {
    let result = state.pages.resume(page.view(), &state.catalog);
    state.respond(&page, result.map_err(AppError::from))
}

pub async fn not_found(State(state): State<Arc<AppState>>, page: PageRequest) -> Response {
    state.not_found_page(&page)
}

#[derive(Debug, Deserialize)]
pub struct ToggleQuery {
    next: Option<String>,
}

/// Flip the theme cookie and go back to `next`
pub async fn toggle_theme(page: PageRequest, Query(query): Query<ToggleQuery>) -> Response {
    let mode = page.theme.toggled();
    let target = query
        .next
        .filter(|next| is_local_path(next))
        .unwrap_or_else(|| "/".to_string());

    tracing::debug!("Theme switched to {}, returning to {}", mode, target);
    (
        [(header::SET_COOKIE, mode.set_cookie())],
        Redirect::to(&target),
    )
        .into_response()
}

pub async fn api_posts(State(state): State<Arc<AppState>>) -> Response {
    match state.load_posts().await {
        Ok(posts) => Json(state.pages.post_summaries(&posts)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// One post with its parsed body blocks
pub async fn api_post(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let loader = state.site.loader();
    let found = tokio::task::spawn_blocking(move || loader.get_post_by_slug(&slug)).await;

    match found {
        Ok(Ok(Some(post))) => Json(json!({
            "post": PostSummary::new(state.pages.config(), &post),
            "blocks": parse_blocks(&post.body),
        }))
        .into_response(),
        Ok(Ok(None)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Post not found" })),
        )
            .into_response(),
        Ok(Err(err)) => AppError::from(err).into_response(),
        Err(err) => AppError::Internal(err.into()).into_response(),
    }
}

pub async fn atom(State(state): State<Arc<AppState>>) -> Response {
    match state.load_posts().await {
        Ok(posts) => (
            [(header::CONTENT_TYPE, "application/atom+xml; charset=utf-8")],
            generator::atom_feed(&state.pages, &posts),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn sitemap(State(state): State<Arc<AppState>>) -> Response {
    match state.load_posts().await {
        Ok(posts) => (
            [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
            generator::sitemap(state.pages.config(), &posts),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn robots(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    generator::robots(state.pages.config())
}
