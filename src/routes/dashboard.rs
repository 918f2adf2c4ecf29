// routes/dashboard.rs
//
// Browser forms. Each action reuses the API services and redirects back to
// the dashboard with a one-line notice.

use astra::Request;

use super::email::{send_many, BulkSendRequest};
use super::leads::{create_lead, NewLead};
use super::messages::{generate_many, BulkGenerateRequest};
use super::{parse_query, query_param, Form};
use crate::domain::{LeadPatch, LeadStatus};
use crate::errors::ServerError;
use crate::flow::{run_flow, FlowRequest};
use crate::responses::{html_response, redirect, ResultResp};
use crate::scraper::{clamp_max_results, scrape_and_store};
use crate::state::AppState;
use crate::store::LeadStats;
use crate::templates::pages::{dashboard_page, DashboardVm};

fn back_with(notice: &str) -> ResultResp {
    let encoded: String = url::form_urlencoded::byte_serialize(notice.as_bytes()).collect();
    redirect(&format!("/?notice={encoded}"))
}

fn required<'a>(form: &'a Form, key: &str, message: &str) -> Result<&'a str, ServerError> {
    form.get(key).ok_or_else(|| ServerError::BadRequest(message.to_string()))
}

fn optional_number<T: std::str::FromStr>(form: &Form, key: &str) -> Result<Option<T>, ServerError> {
    form.get(key)
        .map(|raw| {
            raw.parse()
                .map_err(|_| ServerError::BadRequest(format!("Invalid number for {key}: {raw}")))
        })
        .transpose()
}

/// GET / and GET /dashboard
pub fn page(req: &Request, state: &AppState) -> ResultResp {
    let params = parse_query(req);
    let leads = state.store.list(None, None)?;

    let vm = DashboardVm {
        stats: LeadStats::from_leads(&leads),
        groups: DashboardVm::group(leads),
        notice: query_param(&params, "notice").map(str::to_string),
        default_subject: state.settings.default_subject.clone(),
        daily_email_limit: state.settings.daily_email_limit,
    };
    html_response(dashboard_page(&vm))
}

/// POST /dashboard/scrape
pub fn scrape(mut req: Request, state: &AppState) -> ResultResp {
    let form = Form::read(&mut req)?;
    let query = required(&form, "searchQuery", "Search query is required")?;
    let max = clamp_max_results(optional_number(&form, "maxResults")?);

    let outcome = scrape_and_store(state.source.as_ref(), state.store.as_ref(), query, max)?;
    back_with(&format!(
        "Found {} leads for \"{query}\" ({} stored)",
        outcome.found, outcome.stored
    ))
}

/// POST /dashboard/flow
pub fn flow(mut req: Request, state: &AppState) -> ResultResp {
    let form = Form::read(&mut req)?;
    let flow_req = FlowRequest {
        search_query: required(&form, "searchQuery", "Search query is required")?.to_string(),
        ai_prompt_template: form.get("aiPromptTemplate").map(str::to_string),
        daily_email_limit: optional_number(&form, "dailyEmailLimit")?,
        campaign_name: form.get("campaignName").map(str::to_string),
    };

    let report = run_flow(state, &flow_req)?;
    let mut notice = format!(
        "{}: {} found, {} messages generated, {} emails sent",
        report.campaign_name, report.leads_found, report.messages_generated, report.emails_sent
    );
    if !report.errors.is_empty() {
        notice.push_str(&format!(" (errors: {})", report.errors.join("; ")));
    }
    back_with(&notice)
}

/// POST /dashboard/generate
pub fn generate(mut req: Request, state: &AppState) -> ResultResp {
    let form = Form::read(&mut req)?;
    let out = generate_many(
        state,
        BulkGenerateRequest {
            lead_ids: form.get_all("leadIds"),
            leads: Vec::new(),
            prompt_template: form.get("promptTemplate").map(str::to_string),
        },
    )?;
    back_with(&format!("Generated {} messages", out.results.len()))
}

/// POST /dashboard/send
pub fn send(mut req: Request, state: &AppState) -> ResultResp {
    let form = Form::read(&mut req)?;
    let out = send_many(
        state,
        &BulkSendRequest {
            lead_ids: form.get_all("leadIds"),
            subject: form.get("subject").map(str::to_string),
        },
    )?;
    back_with(&format!("Sent {} of {} emails", out.total_sent, out.total_attempted))
}

/// POST /dashboard/leads
pub fn add_lead(mut req: Request, state: &AppState) -> ResultResp {
    let form = Form::read(&mut req)?;
    let text = |key: &str| form.get(key).unwrap_or_default().to_string();

    let new = NewLead {
        name: required(&form, "name", "Name is required")?.to_string(),
        phone: text("phone"),
        website: text("website"),
        address: text("address"),
        city: text("city"),
        state: text("state"),
        emails: form.get_all("email"),
    };
    create_lead(state, new)?;
    back_with("Lead added")
}

/// POST /dashboard/leads/message  Manual edit of the draft text only.
pub fn save_message(mut req: Request, state: &AppState) -> ResultResp {
    let form = Form::read(&mut req)?;
    let id = required(&form, "leadId", "Lead ID is required")?;
    let message = form.get("message").unwrap_or_default().to_string();

    let patch = LeadPatch {
        message: Some(message),
        ..Default::default()
    };
    state.store.update(id, &patch)?;
    back_with("Message saved")
}

/// POST /dashboard/leads/delete
pub fn delete_lead(mut req: Request, state: &AppState) -> ResultResp {
    let form = Form::read(&mut req)?;
    let id = required(&form, "leadId", "Lead ID is required")?;
    state.store.update(id, &LeadPatch::status(LeadStatus::Deleted))?;
    back_with("Lead deleted")
}
