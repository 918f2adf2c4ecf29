// flow.rs
//
// scrape -> draft -> send, in order, in-process.
// Stages 2 and 3 read the global status sets, so leftovers from an earlier
// run are picked up by the next one.

use serde::{Deserialize, Serialize};

use crate::domain::LeadStatus;
use crate::drafting::draft_many;
use crate::errors::ServerError;
use crate::scraper::{scrape_and_store, MAX_RESULTS_CAP};
use crate::state::AppState;
use crate::store::LeadStats;

pub const DEFAULT_CAMPAIGN: &str = "Auto Campaign";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowRequest {
    pub search_query: String,
    pub ai_prompt_template: Option<String>,
    pub daily_email_limit: Option<u32>,
    pub campaign_name: Option<String>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowReport {
    pub success: bool,
    pub campaign_name: String,
    pub leads_found: usize,
    pub messages_generated: usize,
    pub emails_sent: usize,
    pub errors: Vec<String>,
}

pub fn run_flow(state: &AppState, req: &FlowRequest) -> Result<FlowReport, ServerError> {
    let query = req.search_query.trim();
    if query.is_empty() {
        return Err(ServerError::BadRequest("Search query is required".into()));
    }

    let daily_limit = match req.daily_email_limit {
        Some(limit) => limit as usize,
        // A configured 0 means the limiter is off; only the scrape cap applies.
        None if state.settings.daily_email_limit == 0 => MAX_RESULTS_CAP,
        None => state.settings.daily_email_limit as usize,
    };
    let campaign = req
        .campaign_name
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CAMPAIGN)
        .to_string();

    let mut report = FlowReport {
        campaign_name: campaign,
        ..Default::default()
    };
    tracing::info!(campaign = %report.campaign_name, query, daily_limit, "▶️ flow started");

    // 1. scrape, at most as many results as we may send today
    if daily_limit == 0 {
        tracing::info!(campaign = %report.campaign_name, "daily limit is 0, nothing to scrape or send");
    } else {
        match scrape_and_store(
            state.source.as_ref(),
            state.store.as_ref(),
            query,
            daily_limit.min(MAX_RESULTS_CAP),
        ) {
            Ok(outcome) => report.leads_found = outcome.found,
            Err(e) => report.errors.push(format!("Scraping failed: {e}")),
        }
    }

    // 2. draft every sourced lead
    if report.leads_found > 0 {
        match state.store.list(Some(LeadStatus::Sourced), None) {
            Ok(leads) => {
                let drafted = draft_many(
                    state.completion.as_ref(),
                    state.store.as_ref(),
                    leads,
                    req.ai_prompt_template.as_deref(),
                );
                report.messages_generated = drafted.results.len();
            }
            Err(e) => report.errors.push(format!("Message generation error: {e}")),
        }
    }

    // 3. send to drafted leads, capped at the daily limit
    if report.messages_generated > 0 {
        match state.store.list(Some(LeadStatus::MessageGenerated), None) {
            Ok(mut leads) => {
                leads.truncate(daily_limit);
                let sent = state
                    .outreach()
                    .send_bulk(&leads, &state.settings.default_subject);
                report.emails_sent = sent.total_sent;
            }
            Err(e) => report.errors.push(format!("Email sending error: {e}")),
        }
    }

    report.success = report.errors.is_empty();
    tracing::info!(
        campaign = %report.campaign_name,
        found = report.leads_found,
        generated = report.messages_generated,
        sent = report.emails_sent,
        errors = report.errors.len(),
        "⏹️ flow completed"
    );
    Ok(report)
}

pub fn lead_stats(state: &AppState) -> Result<LeadStats, ServerError> {
    let leads = state.store.list(None, None)?;
    Ok(LeadStats::from_leads(&leads))
}
