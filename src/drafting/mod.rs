//! Outreach message drafting through a hosted completion API.

mod azure;
pub mod prompt;
pub mod validation;

pub use azure::AzureOpenAiClient;
pub use validation::{validate_message, MessageCheck};

use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::{Lead, LeadPatch};
use crate::store::LeadStore;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Completion request failed: {0}")]
    Network(String),

    #[error("Completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected completion response: {0}")]
    Decode(String),

    #[error("Completion returned no content")]
    EmptyCompletion,
}

/// One chat turn: fixed system instruction plus a user prompt.
pub trait CompletionProvider: Send + Sync {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, DraftError>;
}

/// Draft a message for one lead. Validation issues are logged, never fatal.
pub fn draft(
    provider: &dyn CompletionProvider,
    lead: &Lead,
    template: Option<&str>,
) -> Result<String, DraftError> {
    let prompt = prompt::fill_placeholders(prompt::choose_template(template), lead);
    let message = provider.complete(prompt::SYSTEM_PROMPT, &prompt)?;

    let check = validate_message(&message);
    if !check.is_valid {
        tracing::warn!(
            lead_id = lead.id.as_deref().unwrap_or("-"),
            issues = ?check.issues,
            "generated message has issues"
        );
    }
    Ok(message)
}

#[derive(Debug, Default)]
pub struct BulkDraft {
    /// Lead id to drafted message, for leads whose draft was saved.
    pub results: BTreeMap<String, String>,
    /// The saved leads with their new message and status applied.
    pub leads: Vec<Lead>,
}

/// Draft and save for each lead in turn. A failing lead is logged and skipped.
pub fn draft_many(
    provider: &dyn CompletionProvider,
    store: &dyn LeadStore,
    leads: Vec<Lead>,
    template: Option<&str>,
) -> BulkDraft {
    let mut out = BulkDraft::default();

    for mut lead in leads {
        let Some(id) = lead.id.clone() else {
            tracing::warn!(name = %lead.name, "lead has no id, skipping draft");
            continue;
        };

        let message = match draft(provider, &lead, template) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(lead_id = %id, error = %e, "draft failed, skipping");
                continue;
            }
        };

        let patch = LeadPatch::drafted(message.clone());
        if let Err(e) = store.update(&id, &patch) {
            tracing::warn!(lead_id = %id, error = %e, "saving draft failed, skipping");
            continue;
        }

        lead.apply(&patch);
        out.results.insert(id, message);
        out.leads.push(lead);
    }

    tracing::info!(generated = out.results.len(), "bulk draft finished");
    out
}
