//! Outbound email: the sender abstraction and the Resend HTTP client

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

use crate::config::EmailConfig;

const TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("email provider answered {status}: {body}")]
    Provider { status: u16, body: String },
}

/// A fully rendered email ready to hand to a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Something that can deliver an email and report the provider's id for it
pub trait EmailSender: Send + Sync + 'static {
    fn send<'a>(
        &'a self,
        message: &'a EmailMessage,
    ) -> Pin<Box<dyn Future<Output = Result<String, EmailError>> + Send + 'a>>;
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// Client for the Resend `POST /emails` endpoint
pub struct ResendClient {
    http_client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl ResendClient {
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
        })
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.api_url)
    }

    async fn post(&self, message: &EmailMessage) -> Result<String, EmailError> {
        let response = self
            .http_client
            .post(self.emails_url())
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let sent: SendResponse = response.json().await?;
        tracing::debug!("Email accepted by provider with id {}", sent.id);
        Ok(sent.id)
    }
}

impl EmailSender for ResendClient {
    fn send<'a>(
        &'a self,
        message: &'a EmailMessage,
    ) -> Pin<Box<dyn Future<Output = Result<String, EmailError>> + Send + 'a>> {
        Box::pin(self.post(message))
    }
}
