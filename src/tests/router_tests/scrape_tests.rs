// src/tests/router_tests/scrape_tests.rs

use http::Method;
use serde_json::json;

use crate::domain::LeadStatus;
use crate::router::serve;
use crate::tests::utils::{body_json, json_request, TestApp};

#[test]
fn scrape_stores_every_result() {
    let app = TestApp::new();

    let resp = serve(
        json_request(Method::POST, "/scrape", json!({ "searchQuery": "plumbers in austin" })),
        &app.state,
    );
    assert_eq!(resp.status(), 200);
    let body = body_json(resp);
    assert_eq!(body["success"], true);
    assert_eq!(body["totalFound"], 3);
    assert_eq!(body["totalStored"], 3);

    let leads = body["leads"].as_array().unwrap();
    assert_eq!(leads.len(), 3);
    for lead in leads {
        let id = lead["id"].as_str().expect("stored lead has an id");
        let saved = app.lead(id);
        assert_eq!(saved.status, LeadStatus::Sourced);
        assert!(saved.scraped_at.is_some());
    }
    assert_eq!(leads[0]["city"], "Austin");
    assert_eq!(leads[0]["state"], "TX");
}

#[test]
fn max_results_is_passed_through() {
    let app = TestApp::new();
    let body = body_json(serve(
        json_request(
            Method::POST,
            "/scrape",
            json!({ "searchQuery": "plumbers", "maxResults": 1 }),
        ),
        &app.state,
    ));
    assert_eq!(body["totalFound"], 1);
}

#[test]
fn missing_query_is_400_without_provider_call() {
    let app = TestApp::new();
    let resp = serve(json_request(Method::POST, "/scrape", json!({})), &app.state);
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["error"], "Search query is required");
    assert!(app.state.store.list(None, None).unwrap().is_empty());
}

#[test]
fn provider_failure_is_500() {
    let app = TestApp::with_failing_source();
    let resp = serve(
        json_request(Method::POST, "/scrape", json!({ "searchQuery": "plumbers" })),
        &app.state,
    );
    assert_eq!(resp.status(), 500);
    let body = body_json(resp);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("provider unavailable"));
}
