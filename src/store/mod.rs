//! Lead persistence.
//!
//! Every backend implements [`LeadStore`]. Handlers only see the trait, so the
//! hosted spreadsheet and the local SQLite file are interchangeable.

mod airtable;
mod fields;

pub use airtable::AirtableStore;

use crate::domain::{Lead, LeadPatch, LeadStatus};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The lead failed validation; nothing was written.
    #[error("{0}")]
    Invalid(String),

    #[error("lead {0} not found")]
    NotFound(String),

    #[error("Database Error: {0}")]
    Db(String),

    #[error("Store request failed: {0}")]
    Network(String),

    #[error("Store API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected store response: {0}")]
    Decode(String),
}

pub trait LeadStore: Send + Sync {
    /// Persist a new lead and return the id the backend assigned.
    /// Stamps created/updated timestamps.
    fn create(&self, lead: &Lead) -> Result<String, StoreError>;

    /// Write only the fields present in `patch`. An empty patch is a no-op.
    fn update(&self, id: &str, patch: &LeadPatch) -> Result<(), StoreError>;

    /// Newest first (best effort). `status` filters by equality; `limit` caps the result.
    fn list(&self, status: Option<LeadStatus>, limit: Option<usize>) -> Result<Vec<Lead>, StoreError>;

    fn get_by_id(&self, id: &str) -> Result<Option<Lead>, StoreError>;
}

/// Count of leads per status, as shown on the dashboard and `GET /flow/run`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub total: usize,
    pub sourced: usize,
    pub message_generated: usize,
    pub contacted: usize,
    pub replied: usize,
    pub converted: usize,
}

impl LeadStats {
    pub fn from_leads(leads: &[Lead]) -> Self {
        let count = |status: LeadStatus| leads.iter().filter(|l| l.status == status).count();
        Self {
            total: leads.len(),
            sourced: count(LeadStatus::Sourced),
            message_generated: count(LeadStatus::MessageGenerated),
            contacted: count(LeadStatus::Contacted),
            replied: count(LeadStatus::Replied),
            converted: count(LeadStatus::Converted),
        }
    }
}

/// Resolve ids against the store, keeping the caller's order and dropping unknown ids.
pub fn leads_by_ids(store: &dyn LeadStore, ids: &[String]) -> Result<Vec<Lead>, StoreError> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        match store.get_by_id(id)? {
            Some(lead) => out.push(lead),
            None => tracing::warn!(lead_id = %id, "lead not found, skipping"),
        }
    }
    Ok(out)
}
