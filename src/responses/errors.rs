use crate::errors::ServerError;
use crate::templates::components::error_page;
use astra::{Body, Response, ResponseBuilder};
use serde_json::json;

fn log_failure(err: &ServerError, status: u16) {
    if status >= 500 {
        tracing::error!(status, error = %err, "request failed");
    } else {
        tracing::debug!(status, error = %err, "request rejected");
    }
}

/// `{ "success": false, "error": "..." }` with the mapped status.
pub fn json_error_response(err: ServerError) -> Response {
    let status = err.status();
    log_failure(&err, status);

    let body = json!({ "success": false, "error": err.to_string() }).to_string();
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}

/// Error page for browser routes.
pub fn html_error_response(err: ServerError) -> Response {
    let status = err.status();
    log_failure(&err, status);

    let html = error_page(status, &err.to_string()).into_string();
    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(html))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
