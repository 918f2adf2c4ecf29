use crate::errors::ServerError;
use crate::responses::{html_error_response, json_error_response, ResultResp};
use crate::routes::{dashboard, email, flow, health, leads, messages, scrape};
use crate::state::AppState;
use astra::{Request, Response};
use std::time::Instant;

/// Browser pages get HTML errors; everything else is the JSON API.
fn is_browser_route(path: &str) -> bool {
    path == "/" || path == "/dashboard" || path.starts_with("/dashboard/")
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    match (method.as_str(), path.as_str()) {
        // Dashboard
        ("GET", "/") | ("GET", "/dashboard") => dashboard::page(&req, state),
        ("POST", "/dashboard/scrape") => dashboard::scrape(req, state),
        ("POST", "/dashboard/flow") => dashboard::flow(req, state),
        ("POST", "/dashboard/generate") => dashboard::generate(req, state),
        ("POST", "/dashboard/send") => dashboard::send(req, state),
        ("POST", "/dashboard/leads") => dashboard::add_lead(req, state),
        ("POST", "/dashboard/leads/message") => dashboard::save_message(req, state),
        ("POST", "/dashboard/leads/delete") => dashboard::delete_lead(req, state),

        // Leads
        ("GET", "/leads") => leads::list(&req, state),
        ("POST", "/leads") => leads::create(req, state),
        ("PUT", "/leads") => leads::update(req, state),
        ("DELETE", "/leads") => leads::delete(&req, state),
        ("GET", "/leads/export") => leads::export(&req, state),

        // Pipeline stages
        ("POST", "/scrape") => scrape::scrape(req, state),
        ("POST", "/messages/generate") => messages::generate(req, state),
        ("PUT", "/messages/generate") => messages::generate_bulk(req, state),
        ("POST", "/email/send") => email::send(req, state),
        ("PUT", "/email/send") => email::send_bulk(req, state),
        ("POST", "/flow/run") => flow::run(req, state),
        ("GET", "/flow/run") => flow::stats(state),

        ("GET", "/health") => health::health(),
        ("GET", "/health/config") => health::config(state),

        _ => Err(ServerError::NotFound),
    }
}

/// Route, render any error, and log the request.
pub fn serve(req: Request, state: &AppState) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let resp = match handle(req, state) {
        Ok(resp) => resp,
        Err(err) if is_browser_route(&path) => html_error_response(err),
        Err(err) => json_error_response(err),
    };

    tracing::info!(
        %method,
        path = %path,
        status = resp.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    resp
}
