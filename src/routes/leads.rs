// routes/leads.rs
use astra::Request;
use serde::Deserialize;
use serde_json::json;

use super::{parse_query, parse_status, query_param, read_json};
use crate::domain::{Lead, LeadPatch, LeadStatus};
use crate::errors::ServerError;
use crate::responses::{json_ok, ResultResp};
use crate::spreadsheets::export_leads_xlsx;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewLead {
    pub name: String,
    pub phone: String,
    pub website: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub emails: Vec<String>,
}

impl NewLead {
    pub fn into_lead(self) -> Lead {
        Lead {
            name: self.name,
            phone: self.phone,
            website: self.website,
            address: self.address,
            city: self.city,
            state: self.state,
            emails: self.emails,
            status: LeadStatus::Sourced,
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UpdateRequest {
    lead_id: Option<String>,
    updates: LeadPatch,
}

const DEFAULT_LIST_LIMIT: usize = 50;

/// Absent means [`DEFAULT_LIST_LIMIT`]; the value must be a positive integer.
fn parse_limit(raw: Option<&str>) -> Result<usize, ServerError> {
    let Some(s) = raw else {
        return Ok(DEFAULT_LIST_LIMIT);
    };
    match s.parse::<usize>() {
        Ok(0) | Err(_) => Err(ServerError::BadRequest(format!("Invalid limit: {s}"))),
        Ok(n) => Ok(n),
    }
}

/// GET /leads?status=&limit=
pub fn list(req: &Request, state: &AppState) -> ResultResp {
    let params = parse_query(req);
    let status = parse_status(query_param(&params, "status"))?;
    let limit = parse_limit(query_param(&params, "limit"))?;

    let leads = state.store.list(status, Some(limit))?;
    json_ok(&json!({ "success": true, "total": leads.len(), "leads": leads }))
}

/// Shared by the JSON and form create paths.
pub fn create_lead(state: &AppState, new: NewLead) -> Result<String, ServerError> {
    let lead = new.into_lead();
    lead.validate().map_err(ServerError::BadRequest)?;
    let id = state.store.create(&lead)?;
    tracing::info!(lead_id = %id, name = %lead.name, "lead created");
    Ok(id)
}

/// POST /leads
pub fn create(mut req: Request, state: &AppState) -> ResultResp {
    let new: NewLead = read_json(&mut req)?;
    let id = create_lead(state, new)?;
    json_ok(&json!({ "success": true, "leadId": id }))
}

/// PUT /leads  `{ leadId, updates }`
pub fn update(mut req: Request, state: &AppState) -> ResultResp {
    let body: UpdateRequest = read_json(&mut req)?;
    let id = body
        .lead_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest("Lead ID is required".into()))?;

    state.store.update(&id, &body.updates)?;
    json_ok(&json!({ "success": true }))
}

/// DELETE /leads?id=  Soft delete: the row stays, status becomes `deleted`.
pub fn delete(req: &Request, state: &AppState) -> ResultResp {
    let params = parse_query(req);
    let id = query_param(&params, "id").ok_or_else(|| ServerError::BadRequest("Lead ID is required".into()))?;

    state.store.update(id, &LeadPatch::status(LeadStatus::Deleted))?;
    tracing::info!(lead_id = %id, "lead soft-deleted");
    json_ok(&json!({ "success": true }))
}

/// GET /leads/export?status=
pub fn export(req: &Request, state: &AppState) -> ResultResp {
    let params = parse_query(req);
    let status = parse_status(query_param(&params, "status"))?;
    let leads = state.store.list(status, None)?;
    export_leads_xlsx(&leads, status)
}
