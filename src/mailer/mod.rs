use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Clone, Debug)]
pub struct MailerConfig {
    pub api_url: String,
    pub api_token: String,
    pub from: String,
}

impl MailerConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let api_url = env::var("MAIL_API_URL")
            .map_err(|_| AppError::BadRequest("MAIL_API_URL is not set".to_string()))?;
        let api_token = env::var("MAIL_API_TOKEN")
            .map_err(|_| AppError::BadRequest("MAIL_API_TOKEN is not set".to_string()))?;
        let from = env::var("MAIL_FROM")
            .unwrap_or_else(|_| "no-reply@institute.example".to_string());

        Ok(Self {
            api_url,
            api_token,
            from,
        })
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> Result<(), AppError>;
}

/// Forwards send requests to the upstream mail transport's HTTP API.
pub struct HttpMailer {
    client: Client,
    config: MailerConfig,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl HttpMailer {
    pub fn new(config: MailerConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), AppError> {
        let request_body = SendRequest {
            from: &self.config.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_token))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AppError::Mail(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Mail(format!("mail API error {}: {}", status, body)));
        }

        Ok(())
    }
}

/// Stand-in when no transport is configured; logs and reports success.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, email: &EmailMessage) -> Result<(), AppError> {
        info!("mail transport not configured, dropping email to {}", email.to);
        Ok(())
    }
}
