// routes/flow.rs
use astra::Request;
use serde_json::json;

use super::read_json;
use crate::flow::{lead_stats, run_flow, FlowRequest};
use crate::responses::{json_ok, ResultResp};
use crate::state::AppState;

/// POST /flow/run
pub fn run(mut req: Request, state: &AppState) -> ResultResp {
    let body: FlowRequest = read_json(&mut req)?;
    let report = run_flow(state, &body)?;
    json_ok(&report)
}

/// GET /flow/run
pub fn stats(state: &AppState) -> ResultResp {
    let stats = lead_stats(state)?;
    json_ok(&json!({ "success": true, "stats": stats }))
}
