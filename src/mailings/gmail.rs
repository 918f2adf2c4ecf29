// mailings/gmail.rs
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::mime::{compose, encode_raw, Envelope};
use super::{MailError, Mailer, OutgoingEmail};
use crate::config::GmailConfig;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SEND_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

/// Sends through the Gmail API as the account behind the refresh token.
///
/// Access tokens are exchanged per send; volume is capped far below the
/// point where caching them would matter.
pub struct GmailMailer {
    client: Client,
    cfg: GmailConfig,
}

impl GmailMailer {
    pub fn new(cfg: GmailConfig) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MailError::Network(e.to_string()))?;

        Ok(Self { client, cfg })
    }

    fn access_token(&self) -> Result<String, MailError> {
        let resp = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.cfg.client_id.as_str()),
                ("client_secret", self.cfg.client_secret.as_str()),
                ("refresh_token", self.cfg.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .map_err(|e| MailError::Network(format!("token exchange: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(MailError::Api {
                status: status.as_u16(),
                message: format!("token exchange failed: {text}"),
            });
        }

        let token: TokenResponse = resp.json().map_err(|e| MailError::Decode(e.to_string()))?;
        Ok(token.access_token)
    }
}

impl Mailer for GmailMailer {
    fn sender(&self) -> &str {
        &self.cfg.from_email
    }

    fn send(&self, email: &OutgoingEmail) -> Result<Option<String>, MailError> {
        let raw = compose(&Envelope {
            from_name: &self.cfg.from_name,
            from_email: &self.cfg.from_email,
            to: &email.to,
            subject: &email.subject,
            body: &email.body,
        });

        let token = self.access_token()?;
        let resp = self
            .client
            .post(SEND_URL)
            .bearer_auth(token)
            .json(&json!({ "raw": encode_raw(&raw) }))
            .send()
            .map_err(|e| MailError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(MailError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let sent: SendResponse = resp.json().map_err(|e| MailError::Decode(e.to_string()))?;
        tracing::info!(to = %email.to, lead = %email.lead_name, message_id = ?sent.id, "📧 email sent");
        Ok(sent.id)
    }
}
