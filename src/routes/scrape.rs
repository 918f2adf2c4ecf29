// routes/scrape.rs
use astra::Request;
use serde::Deserialize;
use serde_json::json;

use super::read_json;
use crate::responses::{json_ok, ResultResp};
use crate::scraper::{clamp_max_results, scrape_and_store};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ScrapeRequest {
    search_query: String,
    max_results: Option<usize>,
}

/// POST /scrape  `{ searchQuery, maxResults? }`
pub fn scrape(mut req: Request, state: &AppState) -> ResultResp {
    let body: ScrapeRequest = read_json(&mut req)?;

    let outcome = scrape_and_store(
        state.source.as_ref(),
        state.store.as_ref(),
        &body.search_query,
        clamp_max_results(body.max_results),
    )?;

    json_ok(&json!({
        "success": true,
        "totalFound": outcome.found,
        "totalStored": outcome.stored,
        "leads": outcome.leads,
    }))
}
