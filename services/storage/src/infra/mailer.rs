use std::time::Duration;

use serde::Serialize;

use crate::domain::repository::EmailSender;
use crate::domain::types::EmailMessage;
use crate::error::StorageServiceError;

const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct RelayRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Posts messages as JSON to an HTTP mail relay.
#[derive(Clone)]
pub struct HttpEmailSender {
    client: reqwest::Client,
    relay_url: String,
    from: String,
}

impl HttpEmailSender {
    pub fn new(relay_url: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url: relay_url.into(),
            from: from.into(),
        }
    }
}

impl EmailSender for HttpEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), StorageServiceError> {
        let body = RelayRequest {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };
        let resp = self
            .client
            .post(&self.relay_url)
            .timeout(RELAY_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("mail relay request failed: {e}"))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("mail relay returned {status}").into());
        }
        Ok(())
    }
}

/// Writes messages to the log instead of sending them. Used when no relay is configured.
#[derive(Clone, Copy, Default)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), StorageServiceError> {
        tracing::info!(to = %message.to, subject = %message.subject, "email (log only)");
        // The body carries the reset code.
        tracing::debug!(to = %message.to, body = %message.body, "email body (log only)");
        Ok(())
    }
}

#[derive(Clone)]
pub enum Mailer {
    Http(HttpEmailSender),
    Log(LogEmailSender),
}

impl Mailer {
    pub fn from_config(relay_url: Option<&str>, from: &str) -> Self {
        match relay_url {
            Some(url) if !url.trim().is_empty() => Self::Http(HttpEmailSender::new(url.trim(), from)),
            _ => Self::Log(LogEmailSender),
        }
    }
}

impl EmailSender for Mailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), StorageServiceError> {
        match self {
            Self::Http(sender) => sender.send(message).await,
            Self::Log(sender) => sender.send(message).await,
        }
    }
}
