// Thin client for Twilio Programmable Messaging.
//
// Only the single call the marketplace needs is wrapped: sending a text
// message to a phone number. OTP generation and checking happen in the
// server, the provider is a dumb delivery pipe.

use std::collections::HashMap;

pub mod models;
use reqwest::{header, Client};
use tracing::error;

use crate::models::{MessageResponse, TwilioErrorBody};

const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

#[derive(Debug, thiserror::Error)]
pub enum TwilioError {
    #[error("request to Twilio failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Twilio returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("message rejected by Twilio: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number (E.164) or messaging service SID (`MG...`).
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    base_url: String,
    client: Client,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self::with_base_url(options, DEFAULT_BASE_URL)
    }

    /// Point the client at a different host (used for sandboxes and tests).
    pub fn with_base_url(options: TwilioOptions, base_url: impl Into<String>) -> Self {
        Self {
            options,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{base}/2010-04-01/Accounts/{sid}/Messages.json",
            base = self.base_url,
            sid = self.options.account_sid
        )
    }

    /// Send an SMS to `recipient` (E.164 formatted).
    pub async fn send_sms(&self, recipient: &str, body: &str) -> Result<MessageResponse, TwilioError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        let mut form_body: HashMap<&str, &str> = HashMap::new();
        form_body.insert("To", recipient);
        form_body.insert("Body", body);
        if self.options.from.starts_with("MG") {
            form_body.insert("MessagingServiceSid", &self.options.from);
        } else {
            form_body.insert("From", &self.options.from);
        }

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .headers(headers)
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TwilioErrorBody>(&raw)
                .map(|body| body.message)
                .unwrap_or(raw);
            error!(status = status.as_u16(), %message, "Twilio rejected SMS request");
            return Err(TwilioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let message = response.json::<MessageResponse>().await?;
        if message.is_failed() {
            return Err(TwilioError::Rejected(
                message
                    .error_message
                    .clone()
                    .unwrap_or_else(|| message.status.clone()),
            ));
        }

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(from: &str) -> TwilioOptions {
        TwilioOptions {
            account_sid: "AC123".to_string(),
            auth_token: "token".to_string(),
            from: from.to_string(),
        }
    }

    #[test]
    fn test_messages_url_uses_account_sid() {
        let service = TwilioService::new(options("+15550001111"));
        assert_eq!(
            service.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let service = TwilioService::with_base_url(options("+15550001111"), "http://localhost:9999/");
        assert_eq!(
            service.messages_url(),
            "http://localhost:9999/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
