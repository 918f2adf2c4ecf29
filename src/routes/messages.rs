// routes/messages.rs
use astra::Request;
use serde::Deserialize;
use serde_json::json;

use super::read_json;
use crate::domain::{Lead, LeadPatch};
use crate::drafting::{draft, draft_many, BulkDraft};
use crate::errors::ServerError;
use crate::responses::{json_ok, ResultResp};
use crate::state::AppState;
use crate::store::leads_by_ids;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GenerateRequest {
    lead: Option<Lead>,
    prompt_template: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BulkGenerateRequest {
    pub lead_ids: Vec<String>,
    pub leads: Vec<Lead>,
    pub prompt_template: Option<String>,
}

/// POST /messages/generate  Draft for one lead and save it.
pub fn generate(mut req: Request, state: &AppState) -> ResultResp {
    let body: GenerateRequest = read_json(&mut req)?;
    let lead = body
        .lead
        .filter(|l| l.id.as_deref().is_some_and(|id| !id.trim().is_empty()))
        .ok_or_else(|| ServerError::BadRequest("Lead with ID is required".into()))?;
    let id = lead.id.clone().unwrap_or_default();

    let message = draft(state.completion.as_ref(), &lead, body.prompt_template.as_deref())?;
    state.store.update(&id, &LeadPatch::drafted(message.clone()))?;

    tracing::info!(lead_id = %id, "message generated");
    json_ok(&json!({ "success": true, "message": message }))
}

/// Resolve ids against the store, or take inline leads as given.
pub fn generate_many(state: &AppState, body: BulkGenerateRequest) -> Result<BulkDraft, ServerError> {
    let leads = if !body.lead_ids.is_empty() {
        leads_by_ids(state.store.as_ref(), &body.lead_ids)?
    } else if !body.leads.is_empty() {
        body.leads
    } else {
        return Err(ServerError::BadRequest("Lead IDs are required".into()));
    };

    Ok(draft_many(
        state.completion.as_ref(),
        state.store.as_ref(),
        leads,
        body.prompt_template.as_deref(),
    ))
}

/// PUT /messages/generate
pub fn generate_bulk(mut req: Request, state: &AppState) -> ResultResp {
    let body: BulkGenerateRequest = read_json(&mut req)?;
    let out = generate_many(state, body)?;

    json_ok(&json!({
        "success": true,
        "messagesGenerated": out.results.len(),
        "results": out.results,
        "leads": out.leads,
    }))
}
