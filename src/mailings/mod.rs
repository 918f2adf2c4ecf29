//! Outreach delivery: compose, rate-limit, send, then mark the lead contacted.

mod gmail;
pub mod limiter;
pub mod mime;

pub use gmail::GmailMailer;
pub use limiter::{LimitDecision, SendLimiter};

use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::{Lead, LeadPatch};
use crate::errors::ServerError;
use crate::store::LeadStore;

pub const MISSING_EMAIL_OR_MESSAGE: &str = "Missing email or message";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail request failed: {0}")]
    Network(String),

    #[error("Mail API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected mail response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub lead_name: String,
}

pub trait Mailer: Send + Sync {
    /// Address the limiter counts sends against.
    fn sender(&self) -> &str;

    /// Deliver one message; returns the provider's message id when it gives one.
    fn send(&self, email: &OutgoingEmail) -> Result<Option<String>, MailError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendResult {
    fn sent(message_id: Option<String>) -> Self {
        Self {
            success: true,
            message_id,
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct BulkSend {
    pub results: BTreeMap<String, SendResult>,
    pub total_sent: usize,
    pub total_attempted: usize,
}

/// Everything a send touches.
pub struct Outreach<'a> {
    pub mailer: &'a dyn Mailer,
    pub limiter: &'a SendLimiter,
    pub store: &'a dyn LeadStore,
}

impl Outreach<'_> {
    /// Send `message` to the lead's first address.
    ///
    /// Fails with `BadRequest` when there is no address or body and with
    /// `RateLimited` when a window is full. Nothing is sent in either case.
    pub fn send_one(&self, lead: &Lead, message: &str, subject: &str) -> Result<Option<String>, ServerError> {
        let to = match lead.primary_email() {
            Some(to) if !message.trim().is_empty() => to.to_string(),
            _ => return Err(ServerError::BadRequest("Lead email and message are required".into())),
        };

        let now = Utc::now();
        let sender = self.mailer.sender();
        let reservation = match self.limiter.reserve(sender, lead.id.as_deref(), now)? {
            LimitDecision::Allowed(reservation) => reservation,
            LimitDecision::Denied(reason) => {
                tracing::warn!(sender, lead_id = ?lead.id, %reason, "send refused by limiter");
                return Err(ServerError::RateLimited(reason));
            }
        };

        let sent = self.mailer.send(&OutgoingEmail {
            to,
            subject: subject.to_string(),
            body: message.to_string(),
            lead_name: lead.name.clone(),
        });
        let message_id = match sent {
            Ok(message_id) => message_id,
            Err(e) => {
                if let Err(release_err) = self.limiter.release(reservation) {
                    tracing::error!(error = %release_err, "failed to release send slot");
                }
                return Err(e.into());
            }
        };

        // Delivery already happened; bookkeeping failures are logged, not returned.
        if let Err(e) = self.limiter.confirm(reservation, message_id.as_deref()) {
            tracing::error!(error = %e, "failed to record message id in ledger");
        }
        if let Some(id) = lead.id.as_deref() {
            if let Err(e) = self.store.update(id, &LeadPatch::contacted(now)) {
                tracing::error!(lead_id = %id, error = %e, "sent but failed to mark lead contacted");
            }
        }

        Ok(message_id)
    }

    /// Send each lead its stored message, one at a time.
    ///
    /// Leads without an address or message are reported and not attempted.
    /// Every other lead counts as attempted, including those the limiter refuses.
    pub fn send_bulk(&self, leads: &[Lead], subject: &str) -> BulkSend {
        let mut out = BulkSend::default();

        for lead in leads {
            let Some(id) = lead.id.clone() else {
                continue;
            };

            if lead.primary_email().is_none() || !lead.has_message() {
                out.results.insert(id, SendResult::failed(MISSING_EMAIL_OR_MESSAGE));
                continue;
            }

            out.total_attempted += 1;
            let result = match self.send_one(lead, &lead.message, subject) {
                Ok(message_id) => {
                    out.total_sent += 1;
                    SendResult::sent(message_id)
                }
                Err(ServerError::RateLimited(_)) => SendResult::failed("rate limit exceeded"),
                Err(e) => {
                    tracing::warn!(lead_id = %id, error = %e, "send failed, continuing");
                    SendResult::failed(e.to_string())
                }
            };
            out.results.insert(id, result);
        }

        tracing::info!(sent = out.total_sent, attempted = out.total_attempted, "bulk send finished");
        out
    }
}
