use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

use crate::config::WhatsAppConfig;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Send error: {0}")]
    SendFailed(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
}

#[async_trait]
pub trait WhatsAppProvider: Send + Sync {
    /// Sends a plain text message; returns the provider's message id.
    async fn send_text(&self, to: &str, body: &str) -> Result<Option<String>, ProviderError>;
}

/// WhatsApp Business Cloud API client.
pub struct WhatsAppCloudProvider {
    config: WhatsAppConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    messaging_product: &'static str,
    to: String,
    #[serde(rename = "type")]
    message_type: &'static str,
    text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    #[serde(default)]
    messages: Vec<MessageId>,
}

#[derive(Debug, Deserialize)]
struct MessageId {
    id: String,
}

/// Keeps digits only; the Cloud API wants the number without `+` or spaces.
fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

impl WhatsAppCloudProvider {
    pub fn new(config: WhatsAppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { config, client }
    }
}

#[async_trait]
impl WhatsAppProvider for WhatsAppCloudProvider {
    async fn send_text(&self, to: &str, body: &str) -> Result<Option<String>, ProviderError> {
        if self.config.phone_number_id.is_empty()
            || self.config.access_token.expose_secret().is_empty()
        {
            return Err(ProviderError::Configuration(
                "WhatsApp credentials are not configured".to_string(),
            ));
        }

        let to = normalize_phone(to);
        if to.is_empty() {
            return Err(ProviderError::InvalidRecipient(
                "Phone number is empty".to_string(),
            ));
        }

        let url = format!(
            "{}/{}/messages",
            self.config.api_url.trim_end_matches('/'),
            self.config.phone_number_id
        );

        let request = SendMessageRequest {
            messaging_product: "whatsapp",
            to: to.clone(),
            message_type: "text",
            text: TextBody { body },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.access_token.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ProviderError::Connection(format!("Failed to connect to WhatsApp API: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::SendFailed(format!(
                "WhatsApp API returned error status {}: {}",
                status, body
            )));
        }

        let parsed: SendMessageResponse = response.json().await.map_err(|e| {
            ProviderError::SendFailed(format!("Failed to parse WhatsApp response: {}", e))
        })?;

        let message_id = parsed.messages.into_iter().next().map(|m| m.id);
        tracing::info!(to = %to, message_id = ?message_id, "WhatsApp message sent");

        Ok(message_id)
    }
}

/// Logs messages instead of sending them.
#[derive(Default)]
pub struct MockWhatsAppProvider {
    send_count: AtomicU64,
}

impl MockWhatsAppProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WhatsAppProvider for MockWhatsAppProvider {
    async fn send_text(&self, to: &str, body: &str) -> Result<Option<String>, ProviderError> {
        let n = self.send_count.fetch_add(1, Ordering::SeqCst) + 1;

        tracing::info!(
            to = %to,
            body_length = body.len(),
            "[MOCK] WhatsApp message would be sent"
        );

        Ok(Some(format!("mock-wa-{}", n)))
    }
}
