// src/tests/router_tests/health_tests.rs

use http::Method;

use crate::router::serve;
use crate::tests::utils::{body_json, body_string, request, TestApp};

#[test]
fn health_is_ok() {
    let app = TestApp::new();
    let body = body_json(serve(request(Method::GET, "/health"), &app.state));
    assert_eq!(body["status"], "ok");
}

#[test]
fn config_report_has_flags_and_limits_only() {
    let app = TestApp::new();
    let resp = serve(request(Method::GET, "/health/config"), &app.state);
    assert_eq!(resp.status(), 200);

    let raw = body_string(resp);
    let body: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(body["config"]["leadStore"], "sqlite");
    assert_eq!(body["config"]["gmail"], false);
    assert_eq!(body["limits"]["daily"], 50);
    assert_eq!(body["limits"]["hourly"], 10);
    assert!(!raw.contains("outreach@example.com"));
}
