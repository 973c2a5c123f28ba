use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;

use crate::error::NotificationError;
use crate::models::EmailMessage;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), NotificationError>;
}

/// Posts messages as JSON to an HTTP mail relay. Attachments are base64 encoded.
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    sender: String,
}

impl HttpMailer {
    pub fn new(config: &AppConfig) -> Result<Self, NotificationError> {
        if !config.is_mail_configured() {
            return Err(NotificationError::Configuration("MAIL_API_URL is not set".to_string()));
        }

        Ok(Self {
            client: Client::new(),
            api_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
            sender: config.mail_sender.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), NotificationError> {
        let attachments: Vec<_> = message
            .attachments
            .iter()
            .map(|attachment| {
                json!({
                    "filename": attachment.filename,
                    "content_type": attachment.content_type,
                    "content": STANDARD.encode(&attachment.content)
                })
            })
            .collect();

        let payload = json!({
            "from": self.sender,
            "to": [message.to],
            "subject": message.subject,
            "html": message.html,
            "attachments": attachments
        });

        debug!("Posting mail for {} to relay", message.to);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                message: body,
            });
        }

        info!("Mail '{}' delivered to relay for {}", message.subject, message.to);
        Ok(())
    }
}

/// Logs messages instead of sending them. Used when no relay is configured.
#[derive(Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), NotificationError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            attachments = message.attachments.len(),
            "Mail relay not configured, message logged only"
        );
        Ok(())
    }
}
