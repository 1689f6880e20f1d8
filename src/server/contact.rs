//! `POST /api/contact`

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use super::AppState;
use crate::contact::{validate, ContactPayload, FieldIssue};

fn bad_request(error: &str, issues: Vec<FieldIssue>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": error, "issues": issues })),
    )
        .into_response()
}

/// Validate a submission and forward it by email
pub async fn submit(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let payload: ContactPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::debug!("Rejected contact body: {}", err);
            return bad_request(
                "Invalid request body",
                vec![FieldIssue::new("body", "Expected a JSON object")],
            );
        }
    };

    let contact_config = &state.site.config.contact;
    let submission = match validate(&payload, contact_config) {
        Ok(submission) => submission,
        Err(errors) => {
            tracing::debug!("{}", errors);
            return bad_request("Validation failed", errors.issues);
        }
    };

    let message = submission.to_email(
        &state.email_from,
        &state.email_to,
        &contact_config.subject_prefix,
    );

    match state.mailer.send(&message).await {
        Ok(id) => {
            tracing::info!("Contact message forwarded (id {})", id);
            Json(json!({ "success": true, "data": { "id": id } })).into_response()
        }
        Err(err) => {
            tracing::error!("Failed to send contact message: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to send message" })),
            )
                .into_response()
        }
    }
}
