//! Maps-data scraping.
//!
//! A [`LeadSource`] turns a free-text query into unsaved [`Lead`]s.
//! [`scrape_and_store`] adds the cleanup every provider needs and writes each
//! result to the store as a `sourced` lead.

mod apify;
mod models;
mod scraper_error;
mod serpapi;

pub use apify::ApifyScraper;
pub use scraper_error::ScraperError;
pub use serpapi::SerpApiScraper;

use chrono::Utc;

use crate::config::ScrapeConfig;
use crate::domain::address::{extract_city, extract_state};
use crate::domain::{Lead, LeadStatus};
use crate::store::LeadStore;

pub const DEFAULT_MAX_RESULTS: usize = 20;
pub const MAX_RESULTS_CAP: usize = 100;

pub trait LeadSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run one search. Results come back unsaved and uncleaned.
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<Lead>, ScraperError>;
}

pub fn build_source(cfg: &ScrapeConfig) -> Result<Box<dyn LeadSource>, ScraperError> {
    Ok(match cfg {
        ScrapeConfig::Apify { token, actor } => Box::new(ApifyScraper::new(token.clone(), actor.clone())?),
        ScrapeConfig::SerpApi { api_key } => Box::new(SerpApiScraper::new(api_key.clone())?),
    })
}

/// `None` and `0` fall back to the default; anything above the cap is clamped.
pub fn clamp_max_results(requested: Option<usize>) -> usize {
    match requested {
        None | Some(0) => DEFAULT_MAX_RESULTS,
        Some(n) => n.min(MAX_RESULTS_CAP),
    }
}

#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    /// Every usable result. Stored ones carry their new id.
    pub leads: Vec<Lead>,
    pub found: usize,
    pub stored: usize,
}

/// Trim the name, fill city/state from the address when the provider left
/// them blank, and mark the lead as freshly sourced.
/// Returns `None` for results without a usable name.
fn normalize(mut lead: Lead, now: chrono::DateTime<Utc>) -> Option<Lead> {
    let name = lead.name.trim();
    if name.is_empty() {
        return None;
    }
    lead.name = name.to_string();

    if lead.city.trim().is_empty() {
        lead.city = extract_city(&lead.address);
    }
    if lead.state.trim().is_empty() {
        lead.state = extract_state(&lead.address);
    }

    lead.id = None;
    lead.status = LeadStatus::Sourced;
    lead.scraped_at.get_or_insert(now);
    Some(lead)
}

/// Search, clean, then persist each result one at a time.
///
/// A failed write is logged and the lead is still reported as found.
pub fn scrape_and_store(
    source: &dyn LeadSource,
    store: &dyn LeadStore,
    query: &str,
    max_results: usize,
) -> Result<ScrapeOutcome, ScraperError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ScraperError::EmptyQuery);
    }

    let now = Utc::now();
    let raw = source.search(query, max_results)?;
    let raw_count = raw.len();

    let mut outcome = ScrapeOutcome::default();
    for mut lead in raw.into_iter().filter_map(|l| normalize(l, now)) {
        outcome.found += 1;
        match store.create(&lead) {
            Ok(id) => {
                lead.id = Some(id);
                outcome.stored += 1;
            }
            Err(e) => {
                tracing::warn!(name = %lead.name, error = %e, "failed to store scraped lead, skipping");
            }
        }
        outcome.leads.push(lead);
    }

    tracing::info!(
        source = source.name(),
        query,
        returned = raw_count,
        found = outcome.found,
        stored = outcome.stored,
        "scrape finished"
    );
    Ok(outcome)
}
