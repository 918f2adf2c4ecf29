// scraper/serpapi.rs
use reqwest::blocking::Client;
use std::time::Duration;

use super::models::SerpResponse;
use super::{LeadSource, ScraperError};
use crate::domain::Lead;

const SEARCH_URL: &str = "https://serpapi.com/search.json";

/// Google Maps results through SerpAPI. Fewer fields than the Apify actor.
pub struct SerpApiScraper {
    client: Client,
    api_key: String,
    search_url: String,
}

impl SerpApiScraper {
    pub fn new(api_key: String) -> Result<Self, ScraperError> {
        Self::with_search_url(api_key, SEARCH_URL)
    }

    pub fn with_search_url(api_key: String, search_url: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            search_url: search_url.to_string(),
        })
    }
}

fn into_leads(resp: SerpResponse, max_results: usize) -> Result<Vec<Lead>, ScraperError> {
    if let Some(err) = resp.error {
        // "Google hasn't returned any results" arrives as an error with a 200.
        if err.contains("hasn't returned any results") {
            return Ok(Vec::new());
        }
        return Err(ScraperError::Provider {
            status: 200,
            message: err,
        });
    }

    Ok(resp
        .local_results
        .unwrap_or_default()
        .into_iter()
        .take(max_results)
        .map(Lead::from)
        .collect())
}

impl LeadSource for SerpApiScraper {
    fn name(&self) -> &'static str {
        "serpapi"
    }

    fn search(&self, query: &str, max_results: usize) -> Result<Vec<Lead>, ScraperError> {
        tracing::info!(query, max_results, "🔎 querying serpapi");

        let resp = self
            .client
            .get(&self.search_url)
            .query(&[
                ("engine", "google_maps"),
                ("type", "search"),
                ("q", query),
                ("api_key", self.api_key.as_str()),
            ])
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

        let body: SerpResponse = resp
            .json()
            .map_err(|e| ScraperError::JsonParse(e.to_string()))?;

        into_leads(body, max_results)
    }
}
