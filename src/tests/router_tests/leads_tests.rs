// src/tests/router_tests/leads_tests.rs

use http::Method;
use serde_json::json;

use crate::domain::{Lead, LeadStatus};
use crate::router::serve;
use crate::tests::utils::{body_bytes, body_json, body_string, json_request, request, TestApp};

#[test]
fn create_then_list_round_trips() {
    let app = TestApp::new();

    let resp = serve(
        json_request(
            Method::POST,
            "/leads",
            json!({ "name": "Joe's Diner", "city": "Austin", "emails": ["joe@diner.com"] }),
        ),
        &app.state,
    );
    assert_eq!(resp.status(), 200);
    let body = body_json(resp);
    assert_eq!(body["success"], true);
    let id = body["leadId"].as_str().unwrap().to_string();

    let body = body_json(serve(request(Method::GET, "/leads"), &app.state));
    assert_eq!(body["total"], 1);
    assert_eq!(body["leads"][0]["id"], id.as_str());
    assert_eq!(body["leads"][0]["name"], "Joe's Diner");
    assert_eq!(body["leads"][0]["status"], "sourced");
}

#[test]
fn create_without_name_is_400_and_writes_nothing() {
    let app = TestApp::new();

    let resp = serve(json_request(Method::POST, "/leads", json!({ "city": "Austin" })), &app.state);
    assert_eq!(resp.status(), 400);
    let body = body_json(resp);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Name is required");

    assert!(app.state.store.list(None, None).unwrap().is_empty());
}

#[test]
fn malformed_json_is_400() {
    let app = TestApp::new();
    let req = http::Request::builder()
        .method(Method::POST)
        .uri("/leads")
        .body(astra::Body::from("{not json"))
        .unwrap();
    assert_eq!(serve(req, &app.state).status(), 400);
}

#[test]
fn list_filters_by_status_and_limit() {
    let app = TestApp::new();
    app.seed(Lead::new("A"));
    let b = app.seed(Lead::new("B"));
    app.seed(Lead::new("C"));
    app.state
        .store
        .update(&b, &crate::domain::LeadPatch::status(LeadStatus::Contacted))
        .unwrap();

    let body = body_json(serve(request(Method::GET, "/leads?status=contacted"), &app.state));
    assert_eq!(body["total"], 1);
    assert_eq!(body["leads"][0]["name"], "B");

    let body = body_json(serve(request(Method::GET, "/leads?limit=2"), &app.state));
    assert_eq!(body["total"], 2);

    let resp = serve(request(Method::GET, "/leads?status=sleeping"), &app.state);
    assert_eq!(resp.status(), 400);
}

#[test]
fn list_defaults_to_fifty_and_rejects_zero() {
    let app = TestApp::new();
    for i in 0..55 {
        app.seed(Lead::new(format!("Shop {i}")));
    }

    let body = body_json(serve(request(Method::GET, "/leads"), &app.state));
    assert_eq!(body["total"], 50);

    let resp = serve(request(Method::GET, "/leads?limit=0"), &app.state);
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["success"], false);
}

#[test]
fn update_writes_only_given_fields() {
    let app = TestApp::new();
    let mut lead = Lead::new("Acme");
    lead.city = "Austin".into();
    let id = app.seed(lead);

    let resp = serve(
        json_request(
            Method::PUT,
            "/leads",
            json!({ "leadId": id, "updates": { "status": "replied" } }),
        ),
        &app.state,
    );
    assert_eq!(resp.status(), 200);

    let saved = app.lead(&id);
    assert_eq!(saved.status, LeadStatus::Replied);
    assert_eq!(saved.city, "Austin");
    assert_eq!(saved.name, "Acme");
}

#[test]
fn empty_patch_changes_nothing() {
    let app = TestApp::new();
    let id = app.seed(Lead::new("Acme"));
    let before = app.lead(&id);

    let resp = serve(
        json_request(Method::PUT, "/leads", json!({ "leadId": id, "updates": {} })),
        &app.state,
    );
    assert_eq!(resp.status(), 200);
    assert_eq!(app.lead(&id), before);
}

#[test]
fn update_requires_lead_id() {
    let app = TestApp::new();
    let resp = serve(
        json_request(Method::PUT, "/leads", json!({ "updates": { "city": "Austin" } })),
        &app.state,
    );
    assert_eq!(resp.status(), 400);
}

#[test]
fn update_unknown_lead_is_404() {
    let app = TestApp::new();
    let resp = serve(
        json_request(
            Method::PUT,
            "/leads",
            json!({ "leadId": "recMissing", "updates": { "city": "Austin" } }),
        ),
        &app.state,
    );
    assert_eq!(resp.status(), 404);
}

#[test]
fn delete_is_soft() {
    let app = TestApp::new();
    let id = app.seed(Lead::new("Acme"));

    let resp = serve(request(Method::DELETE, &format!("/leads?id={id}")), &app.state);
    assert_eq!(resp.status(), 200);

    let saved = app.lead(&id);
    assert_eq!(saved.status, LeadStatus::Deleted);
    assert_eq!(saved.name, "Acme");

    let resp = serve(request(Method::DELETE, "/leads"), &app.state);
    assert_eq!(resp.status(), 400);
}

#[test]
fn export_returns_a_workbook() {
    let app = TestApp::new();
    app.seed(Lead::new("Acme"));

    let resp = serve(request(Method::GET, "/leads/export?status=sourced"), &app.state);
    assert_eq!(resp.status(), 200);
    let disposition = resp.headers()["Content-Disposition"].to_str().unwrap().to_string();
    assert!(disposition.contains("leads_sourced.xlsx"));
    // xlsx is a zip archive
    assert!(body_bytes(resp).starts_with(b"PK"));
}

#[test]
fn unknown_route_is_json_404() {
    let app = TestApp::new();
    let resp = serve(request(Method::GET, "/nope"), &app.state);
    assert_eq!(resp.status(), 404);
    assert!(body_string(resp).contains("\"success\":false"));
}
