// src/store/airtable.rs
use chrono::Utc;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

use super::fields::{lead_from_fields, lead_to_fields, patch_to_fields, CREATED_AT, STATUS};
use super::{LeadStore, StoreError};
use crate::config::AirtableConfig;
use crate::domain::{Lead, LeadPatch, LeadStatus};

const API_BASE: &str = "https://api.airtable.com/v0";
const PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Record {
    id: String,
    #[serde(default)]
    fields: Map<String, Value>,
    #[serde(default)]
    created_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordPage {
    #[serde(default)]
    records: Vec<Record>,
    #[serde(default)]
    offset: Option<String>,
}

/// Leads table in a hosted Airtable base.
pub struct AirtableStore {
    client: Client,
    token: String,
    table_url: String,
}

impl AirtableStore {
    pub fn new(cfg: &AirtableConfig) -> Result<Self, StoreError> {
        Self::with_base_url(cfg, API_BASE)
    }

    pub fn with_base_url(cfg: &AirtableConfig, base_url: &str) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let table_url = format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            cfg.base_id,
            encode_segment(&cfg.table)
        );

        Ok(Self {
            client,
            token: cfg.token.clone(),
            table_url,
        })
    }

    fn send(&self, req: RequestBuilder) -> Result<Response, StoreError> {
        let resp = req
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
        Err(StoreError::Api {
            status: status.as_u16(),
            message: body,
        })
    }

    fn fetch_page(
        &self,
        status: Option<LeadStatus>,
        limit: Option<usize>,
        offset: Option<&str>,
    ) -> Result<RecordPage, StoreError> {
        let query = list_query(status, limit, offset);
        let resp = self.send(self.client.get(&self.table_url).query(&query))?;
        resp.json().map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Query pairs for a list call: equality filter, newest first, optional cap.
fn list_query(
    status: Option<LeadStatus>,
    limit: Option<usize>,
    offset: Option<&str>,
) -> Vec<(String, String)> {
    let mut query = vec![
        ("sort[0][field]".to_string(), CREATED_AT.to_string()),
        ("sort[0][direction]".to_string(), "desc".to_string()),
        (
            "pageSize".to_string(),
            limit.unwrap_or(PAGE_SIZE).clamp(1, PAGE_SIZE).to_string(),
        ),
    ];
    if let Some(status) = status {
        // Status values come from a closed enum, so no quote escaping is needed.
        query.push((
            "filterByFormula".to_string(),
            format!("{{{STATUS}}} = '{}'", status.as_str()),
        ));
    }
    if let Some(limit) = limit {
        query.push(("maxRecords".to_string(), limit.to_string()));
    }
    if let Some(offset) = offset {
        query.push(("offset".to_string(), offset.to_string()));
    }
    query
}

fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

impl LeadStore for AirtableStore {
    fn create(&self, lead: &Lead) -> Result<String, StoreError> {
        lead.validate().map_err(StoreError::Invalid)?;

        let body = json!({
            "fields": lead_to_fields(lead, Utc::now()),
            "typecast": true,
        });
        let resp = self.send(self.client.post(&self.table_url).json(&body))?;
        let record: Record = resp.json().map_err(|e| StoreError::Decode(e.to_string()))?;

        tracing::debug!(lead_id = %record.id, name = %lead.name, "lead created");
        Ok(record.id)
    }

    fn update(&self, id: &str, patch: &LeadPatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            return Ok(());
        }
        patch.validate().map_err(StoreError::Invalid)?;

        let url = format!("{}/{}", self.table_url, encode_segment(id));
        let body = json!({
            "fields": patch_to_fields(patch, Utc::now()),
            "typecast": true,
        });
        match self.send(self.client.patch(url).json(&body)) {
            Ok(_) => Ok(()),
            Err(StoreError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    fn list(&self, status: Option<LeadStatus>, limit: Option<usize>) -> Result<Vec<Lead>, StoreError> {
        let mut leads = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let page = self.fetch_page(status, limit, offset.as_deref())?;
            leads.extend(
                page.records
                    .iter()
                    .map(|r| lead_from_fields(&r.id, &r.fields, r.created_time.as_deref())),
            );

            let full = limit.is_some_and(|n| leads.len() >= n);
            match page.offset {
                Some(next) if !full => offset = Some(next),
                _ => break,
            }
        }

        if let Some(n) = limit {
            leads.truncate(n);
        }
        Ok(leads)
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Lead>, StoreError> {
        let url = format!("{}/{}", self.table_url, encode_segment(id));
        match self.send(self.client.get(url)) {
            Ok(resp) => {
                let r: Record = resp.json().map_err(|e| StoreError::Decode(e.to_string()))?;
                Ok(Some(lead_from_fields(&r.id, &r.fields, r.created_time.as_deref())))
            }
            Err(StoreError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
