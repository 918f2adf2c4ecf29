// src/tests/router_tests/email_tests.rs

use http::Method;
use serde_json::json;

use crate::domain::{Lead, LeadStatus};
use crate::mailings::MISSING_EMAIL_OR_MESSAGE;
use crate::router::serve;
use crate::tests::utils::{body_json, json_request, TestApp};

fn contactable(app: &TestApp, name: &str, email: Option<&str>, message: &str) -> String {
    let mut lead = Lead::new(name);
    lead.emails = email.map(|e| vec![e.to_string()]).unwrap_or_default();
    lead.message = message.to_string();
    app.seed(lead)
}

#[test]
fn single_send_marks_contacted() {
    let app = TestApp::new();
    let id = contactable(&app, "Acme", Some("owner@acme.com"), "");
    let lead = app.lead(&id);

    let resp = serve(
        json_request(
            Method::POST,
            "/email/send",
            json!({ "lead": lead, "message": "Hello, your shop looks great.", "subject": "Hi" }),
        ),
        &app.state,
    );
    assert_eq!(resp.status(), 200);
    let body = body_json(resp);
    assert_eq!(body["success"], true);
    assert_eq!(body["messageId"], "msg-1");

    let saved = app.lead(&id);
    assert_eq!(saved.status, LeadStatus::Contacted);
    assert!(saved.sent_at.is_some());

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Hi");
    assert_eq!(sent[0].body, "Hello, your shop looks great.");
}

#[test]
fn single_send_uses_default_subject() {
    let app = TestApp::new();
    let id = contactable(&app, "Acme", Some("owner@acme.com"), "Saved draft for you");
    let lead = app.lead(&id);

    let resp = serve(json_request(Method::POST, "/email/send", json!({ "lead": lead })), &app.state);
    assert_eq!(resp.status(), 200);
    let sent = app.mailer.sent();
    assert_eq!(sent[0].subject, app.state.settings.default_subject);
    assert_eq!(sent[0].body, "Saved draft for you");
}

#[test]
fn single_send_without_email_is_400() {
    let app = TestApp::new();
    let id = contactable(&app, "Acme", None, "Hello you");
    let lead = app.lead(&id);

    let resp = serve(json_request(Method::POST, "/email/send", json!({ "lead": lead })), &app.state);
    assert_eq!(resp.status(), 400);
    assert!(app.mailer.sent().is_empty());
    assert_eq!(app.lead(&id).status, LeadStatus::Sourced);
}

#[test]
fn bulk_send_counts_only_contactable_leads() {
    let app = TestApp::new();
    let ids = vec![
        contactable(&app, "A", Some("a@x.com"), "Hello you"),
        contactable(&app, "B", None, "Hello you"),
        contactable(&app, "C", Some("c@x.com"), "Hello you"),
        contactable(&app, "D", Some("d@x.com"), "Hello you"),
        contactable(&app, "E", None, "Hello you"),
    ];

    let resp = serve(
        json_request(Method::PUT, "/email/send", json!({ "leadIds": ids })),
        &app.state,
    );
    assert_eq!(resp.status(), 200);
    let body = body_json(resp);
    assert_eq!(body["totalAttempted"], 3);
    assert_eq!(body["totalSent"], 3);

    for skipped in [&ids[1], &ids[4]] {
        assert_eq!(body["results"][skipped]["success"], false);
        assert_eq!(body["results"][skipped]["error"], MISSING_EMAIL_OR_MESSAGE);
        assert_eq!(app.lead(skipped).status, LeadStatus::Sourced);
    }
    assert_eq!(app.lead(&ids[0]).status, LeadStatus::Contacted);
    assert_eq!(app.mailer.sent().len(), 3);
}

#[test]
fn bulk_send_requires_ids() {
    let app = TestApp::new();
    let resp = serve(json_request(Method::PUT, "/email/send", json!({ "leadIds": [] })), &app.state);
    assert_eq!(resp.status(), 400);
}
