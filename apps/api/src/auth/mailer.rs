use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;

const RESET_SUBJECT: &str = "Reset your password";

/// Delivers password-reset links.
#[async_trait]
pub trait ResetMailer: Send + Sync {
    async fn send_reset(&self, to: &str, reset_url: &str) -> Result<(), AppError>;
}

/// Writes the reset link to the log instead of sending mail. Development default.
pub struct LogMailer;

#[async_trait]
impl ResetMailer for LogMailer {
    async fn send_reset(&self, to: &str, reset_url: &str) -> Result<(), AppError> {
        info!("Password reset email for {to}: {reset_url}");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ResetMessage<'a> {
    to: &'a str,
    subject: &'a str,
    reset_url: &'a str,
}

/// POSTs reset messages as JSON to an outbound mail webhook.
pub struct WebhookMailer {
    http: Client,
    url: String,
}

impl WebhookMailer {
    pub fn new(url: String) -> Self {
        Self {
            http: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl ResetMailer for WebhookMailer {
    async fn send_reset(&self, to: &str, reset_url: &str) -> Result<(), AppError> {
        let message = ResetMessage {
            to,
            subject: RESET_SUBJECT,
            reset_url,
        };
        self.http
            .post(&self.url)
            .json(&message)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Mail(format!("mail webhook failed: {}", e.without_url())))?;

        info!("Password reset email queued for {to}");
        Ok(())
    }
}

#[cfg(test)]
pub use capture::{CapturingMailer, FailingMailer};


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_message_shape() {
        let message = ResetMessage {
            to: "jane@example.com",
            subject: RESET_SUBJECT,
            reset_url: "http://localhost:3000/reset-password?token=abc",
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["to"], "jane@example.com");
        assert_eq!(value["subject"], "Reset your password");
        assert!(value["reset_url"].as_str().unwrap().ends_with("token=abc"));
    }

    #[tokio::test]
    async fn test_log_mailer_never_fails() {
        assert!(LogMailer
            .send_reset("jane@example.com", "http://localhost/reset")
            .await
            .is_ok());
    }
}
