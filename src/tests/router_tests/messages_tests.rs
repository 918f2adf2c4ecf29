// src/tests/router_tests/messages_tests.rs

use http::Method;
use serde_json::json;

use crate::domain::{Lead, LeadStatus};
use crate::router::serve;
use crate::tests::utils::{body_json, json_request, TestApp};

#[test]
fn generate_saves_message_and_advances_status() {
    let app = TestApp::new();
    let mut lead = Lead::new("Acme");
    lead.city = "Austin".into();
    let id = app.seed(lead);
    let lead = app.lead(&id);

    let resp = serve(
        json_request(
            Method::POST,
            "/messages/generate",
            json!({ "lead": lead, "promptTemplate": "Write to {{BusinessName}} in {{City}}" }),
        ),
        &app.state,
    );
    assert_eq!(resp.status(), 200);
    let body = body_json(resp);
    assert_eq!(body["message"], "Write to Acme in Austin");

    let saved = app.lead(&id);
    assert_eq!(saved.status, LeadStatus::MessageGenerated);
    assert_eq!(saved.message, "Write to Acme in Austin");
}

#[test]
fn generate_requires_lead_with_id() {
    let app = TestApp::new();
    let resp = serve(
        json_request(Method::POST, "/messages/generate", json!({ "lead": { "name": "Acme" } })),
        &app.state,
    );
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["error"], "Lead with ID is required");
}

#[test]
fn bulk_generate_by_ids_skips_unknown() {
    let app = TestApp::new();
    let a = app.seed(Lead::new("Alpha"));
    let b = app.seed(Lead::new("Beta"));

    let resp = serve(
        json_request(
            Method::PUT,
            "/messages/generate",
            json!({ "leadIds": [a, "recMissing", b], "promptTemplate": "Hi {{BusinessName}}" }),
        ),
        &app.state,
    );
    assert_eq!(resp.status(), 200);
    let body = body_json(resp);
    assert_eq!(body["messagesGenerated"], 2);
    assert_eq!(body["results"][&a], "Hi Alpha");
    assert_eq!(body["results"][&b], "Hi Beta");
    assert_eq!(body["leads"].as_array().unwrap().len(), 2);
    assert_eq!(app.lead(&b).status, LeadStatus::MessageGenerated);
}

#[test]
fn bulk_generate_without_leads_is_400() {
    let app = TestApp::new();
    let resp = serve(json_request(Method::PUT, "/messages/generate", json!({})), &app.state);
    assert_eq!(resp.status(), 400);
}
