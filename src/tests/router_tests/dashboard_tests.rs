// src/tests/router_tests/dashboard_tests.rs

use http::Method;

use crate::domain::{Lead, LeadStatus};
use crate::router::serve;
use crate::tests::utils::{body_string, form_request, request, TestApp};

fn location(resp: &astra::Response) -> String {
    resp.headers()["Location"].to_str().unwrap().to_string()
}

#[test]
fn dashboard_lists_leads_by_status() {
    let app = TestApp::new();
    app.seed(Lead::new("Joe's Diner"));

    for path in ["/", "/dashboard"] {
        let resp = serve(request(Method::GET, path), &app.state);
        assert_eq!(resp.status(), 200);
        let body = body_string(resp);
        assert!(body.contains("Joe&#39;s Diner") || body.contains("Joe's Diner"));
    }
}

#[test]
fn notice_is_shown() {
    let app = TestApp::new();
    let body = body_string(serve(request(Method::GET, "/?notice=Lead%20added"), &app.state));
    assert!(body.contains("Lead added"));
}

#[test]
fn add_lead_form_redirects_back() {
    let app = TestApp::new();
    let resp = serve(
        form_request("/dashboard/leads", &[("name", "Acme"), ("email", "owner@acme.com")]),
        &app.state,
    );
    assert_eq!(resp.status(), 303);
    assert!(location(&resp).starts_with("/?notice="));

    let leads = app.state.store.list(None, None).unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].emails, vec!["owner@acme.com".to_string()]);
}

#[test]
fn scrape_form_stores_results() {
    let app = TestApp::new();
    let resp = serve(
        form_request("/dashboard/scrape", &[("searchQuery", "plumbers"), ("maxResults", "2")]),
        &app.state,
    );
    assert_eq!(resp.status(), 303);
    assert_eq!(app.state.store.list(None, None).unwrap().len(), 2);
}

#[test]
fn generate_then_send_from_checkboxes() {
    let app = TestApp::new();
    let mut lead = Lead::new("Acme");
    lead.emails = vec!["owner@acme.com".into()];
    let id = app.seed(lead);

    let resp = serve(form_request("/dashboard/generate", &[("leadIds", id.as_str())]), &app.state);
    assert_eq!(resp.status(), 303);
    assert_eq!(app.lead(&id).status, LeadStatus::MessageGenerated);

    let resp = serve(
        form_request("/dashboard/send", &[("leadIds", id.as_str()), ("subject", "Hello")]),
        &app.state,
    );
    assert_eq!(resp.status(), 303);
    assert_eq!(app.lead(&id).status, LeadStatus::Contacted);
    assert_eq!(app.mailer.sent()[0].subject, "Hello");
}

#[test]
fn message_edit_and_delete() {
    let app = TestApp::new();
    let id = app.seed(Lead::new("Acme"));

    serve(
        form_request("/dashboard/leads/message", &[("leadId", id.as_str()), ("message", "Edited for you")]),
        &app.state,
    );
    assert_eq!(app.lead(&id).message, "Edited for you");

    serve(form_request("/dashboard/leads/delete", &[("leadId", id.as_str())]), &app.state);
    assert_eq!(app.lead(&id).status, LeadStatus::Deleted);
}

#[test]
fn form_errors_render_html() {
    let app = TestApp::new();
    let resp = serve(form_request("/dashboard/leads", &[("city", "Austin")]), &app.state);
    assert_eq!(resp.status(), 400);
    assert!(resp.headers()["Content-Type"].to_str().unwrap().starts_with("text/html"));
    assert!(body_string(resp).contains("Name is required"));
}
