//! Outbound mail delivery
//!
//! The production sender posts to an HTTP mail API; the noop sender logs
//! instead of delivering and exists for development environments without
//! mail credentials.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

use hook_common::config::MailConfig;
use hook_core::error::DomainError;
use hook_core::traits::MailSender;

/// Request timeout for mail API calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Mail API request body
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
}

/// Mail sender backed by an HTTP mail API
pub struct HttpMailSender {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from_address: String,
}

impl HttpMailSender {
    /// Create a sender from mail configuration
    #[must_use]
    pub fn new(config: &MailConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
        }
    }
}

#[async_trait]
impl MailSender for HttpMailSender {
    #[instrument(skip(self, code))]
    async fn send_verification(&self, email: &str, code: &str) -> Result<(), DomainError> {
        let body = SendRequest {
            from: &self.from_address,
            to: email,
            subject: "Verify your email address",
            text: format!(
                "Welcome to hookforge!\n\n\
                 Confirm your signup with this code: {code}\n\n\
                 The code expires in 24 hours. If you did not request this, ignore this message."
            ),
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::ExternalApi("mail API request timed out".to_string())
                } else {
                    DomainError::ExternalApi(format!("mail API request failed: {e}"))
                }
            })?;

        if !response.status().is_success() {
            return Err(DomainError::ExternalApi(format!(
                "mail API returned {}",
                response.status()
            )));
        }

        debug!(email = %email, "Verification mail sent");
        Ok(())
    }
}

impl std::fmt::Debug for HttpMailSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMailSender")
            .field("api_url", &self.api_url)
            .field("from_address", &self.from_address)
            .finish_non_exhaustive()
    }
}

/// Development-only sender that logs the code instead of delivering it
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMailSender;

#[async_trait]
impl MailSender for NoopMailSender {
    async fn send_verification(&self, email: &str, code: &str) -> Result<(), DomainError> {
        debug!(email = %email, code = %code, "Mail delivery disabled; verification code logged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_request_serialization() {
        let body = SendRequest {
            from: "noreply@hookforge.dev",
            to: "user@example.com",
            subject: "Verify your email address",
            text: "code: abc".to_string(),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["from"], "noreply@hookforge.dev");
        assert_eq!(json["to"], "user@example.com");
    }

    #[tokio::test]
    async fn test_noop_sender_always_succeeds() {
        let sender = NoopMailSender;
        assert!(sender.send_verification("a@b.c", "code").await.is_ok());
    }
}
