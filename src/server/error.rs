//! Errors raised while handling a request

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::content::ContentError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Unknown slug or tag; rendered as the 404 page
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            err => {
                tracing::error!("Request failed: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>Something went wrong</h1><p>Please try again later.</p>"),
                )
                    .into_response()
            }
        }
    }
}
