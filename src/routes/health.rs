// routes/health.rs
use serde_json::json;

use crate::responses::{json_ok, ResultResp};
use crate::state::AppState;

/// GET /health
pub fn health() -> ResultResp {
    json_ok(&json!({ "success": true, "status": "ok" }))
}

/// GET /health/config  Presence flags only, never values.
pub fn config(state: &AppState) -> ResultResp {
    json_ok(&json!({
        "success": true,
        "config": state.settings.config_report,
        "limits": {
            "daily": state.limiter.limits().daily,
            "hourly": state.limiter.limits().hourly,
        },
    }))
}
