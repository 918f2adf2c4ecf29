// scraper/apify.rs
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::models::ApifyPlace;
use super::{LeadSource, ScraperError};
use crate::domain::Lead;

const API_BASE: &str = "https://api.apify.com/v2";

/// Google Maps crawler actor, run synchronously.
///
/// `run-sync-get-dataset-items` blocks until the actor finishes and answers with
/// the dataset, so there is no polling on our side.
pub struct ApifyScraper {
    client: Client,
    token: String,
    actor: String,
    base_url: String,
}

impl ApifyScraper {
    pub fn new(token: String, actor: String) -> Result<Self, ScraperError> {
        Self::with_base_url(token, actor, API_BASE)
    }

    pub fn with_base_url(token: String, actor: String, base_url: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            // Actor runs routinely take minutes.
            .timeout(Duration::from_secs(360))
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Self {
            client,
            token,
            actor,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn run_url(&self) -> String {
        format!("{}/acts/{}/run-sync-get-dataset-items", self.base_url, self.actor)
    }
}

fn run_input(query: &str, max_results: usize) -> Value {
    json!({
        "searchStringsArray": [query],
        "maxCrawledPlacesPerSearch": max_results,
        "language": "en",
    })
}

/// Items that fail to deserialize are skipped; the rest of the dataset is kept.
fn parse_items(items: Vec<Value>) -> Vec<Lead> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<ApifyPlace>(item) {
            Ok(place) => Some(Lead::from(place)),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed dataset item");
                None
            }
        })
        .collect()
}

impl LeadSource for ApifyScraper {
    fn name(&self) -> &'static str {
        "apify"
    }

    fn search(&self, query: &str, max_results: usize) -> Result<Vec<Lead>, ScraperError> {
        tracing::info!(query, max_results, actor = %self.actor, "🕷️ starting actor run");

        let resp = self
            .client
            .post(self.run_url())
            .query(&[("token", self.token.as_str())])
            .json(&run_input(query, max_results))
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(ScraperError::Provider {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: Value = resp
            .json()
            .map_err(|e| ScraperError::JsonParse(e.to_string()))?;

        let items = match body {
            Value::Array(items) => items,
            other => {
                return Err(ScraperError::UnexpectedShape(format!(
                    "expected dataset array, got {}",
                    kind(&other)
                )))
            }
        };

        let mut leads = parse_items(items);
        leads.truncate(max_results);
        tracing::info!(query, found = leads.len(), "✅ actor run complete");
        Ok(leads)
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
