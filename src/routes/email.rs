// routes/email.rs
use astra::Request;
use serde::Deserialize;
use serde_json::json;

use super::read_json;
use crate::domain::Lead;
use crate::errors::ServerError;
use crate::mailings::BulkSend;
use crate::responses::{json_ok, ResultResp};
use crate::state::AppState;
use crate::store::leads_by_ids;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SendRequest {
    lead: Option<Lead>,
    message: Option<String>,
    subject: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BulkSendRequest {
    pub lead_ids: Vec<String>,
    pub subject: Option<String>,
}

fn subject_or_default<'a>(subject: Option<&'a str>, state: &'a AppState) -> &'a str {
    subject
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(&state.settings.default_subject)
}

/// POST /email/send  `{ lead, message, subject? }`
pub fn send(mut req: Request, state: &AppState) -> ResultResp {
    let body: SendRequest = read_json(&mut req)?;
    let lead = body
        .lead
        .ok_or_else(|| ServerError::BadRequest("Lead email and message are required".into()))?;
    // Fall back to the lead's saved draft.
    let message = body.message.unwrap_or_else(|| lead.message.clone());
    let subject = subject_or_default(body.subject.as_deref(), state);

    let message_id = state.outreach().send_one(&lead, &message, subject)?;
    json_ok(&json!({ "success": true, "messageId": message_id }))
}

pub fn send_many(state: &AppState, body: &BulkSendRequest) -> Result<BulkSend, ServerError> {
    if body.lead_ids.is_empty() {
        return Err(ServerError::BadRequest("Lead IDs are required".into()));
    }
    let leads = leads_by_ids(state.store.as_ref(), &body.lead_ids)?;
    let subject = subject_or_default(body.subject.as_deref(), state);
    Ok(state.outreach().send_bulk(&leads, subject))
}

/// PUT /email/send  `{ leadIds, subject? }`
pub fn send_bulk(mut req: Request, state: &AppState) -> ResultResp {
    let body: BulkSendRequest = read_json(&mut req)?;
    let out = send_many(state, &body)?;

    json_ok(&json!({
        "success": true,
        "results": out.results,
        "totalSent": out.total_sent,
        "totalAttempted": out.total_attempted,
    }))
}
