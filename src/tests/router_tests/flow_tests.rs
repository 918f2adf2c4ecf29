// src/tests/router_tests/flow_tests.rs

use http::Method;
use serde_json::json;

use crate::domain::{Lead, LeadPatch, LeadStatus};
use crate::router::serve;
use crate::tests::utils::{body_json, json_request, request, TestApp};

#[test]
fn stats_count_by_status() {
    let app = TestApp::new();
    app.seed(Lead::new("A"));
    let b = app.seed(Lead::new("B"));
    app.state.store.update(&b, &LeadPatch::drafted("Hello you")).unwrap();

    let resp = serve(request(Method::GET, "/flow/run"), &app.state);
    assert_eq!(resp.status(), 200);
    let body = body_json(resp);
    assert_eq!(body["success"], true);
    assert_eq!(body["stats"]["total"], 2);
    assert_eq!(body["stats"]["sourced"], 1);
    assert_eq!(body["stats"]["messageGenerated"], 1);
    assert_eq!(body["stats"]["contacted"], 0);
}

#[test]
fn run_reports_each_stage() {
    let app = TestApp::new();
    let resp = serve(
        json_request(
            Method::POST,
            "/flow/run",
            json!({ "searchQuery": "plumbers in austin", "campaignName": "Spring" }),
        ),
        &app.state,
    );
    assert_eq!(resp.status(), 200);
    let body = body_json(resp);
    assert_eq!(body["success"], true);
    assert_eq!(body["campaignName"], "Spring");
    assert_eq!(body["leadsFound"], 3);
    assert_eq!(body["messagesGenerated"], 3);
    assert_eq!(body["emailsSent"], 3);
    assert!(body["errors"].as_array().unwrap().is_empty());

    let contacted = app.state.store.list(Some(LeadStatus::Contacted), None).unwrap();
    assert_eq!(contacted.len(), 3);
}

#[test]
fn run_without_query_is_400() {
    let app = TestApp::new();
    let resp = serve(json_request(Method::POST, "/flow/run", json!({})), &app.state);
    assert_eq!(resp.status(), 400);
}
