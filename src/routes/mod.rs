//! Request handlers, one module per endpoint family.

pub mod dashboard;
pub mod email;
pub mod flow;
pub mod health;
pub mod leads;
pub mod messages;
pub mod scrape;

use astra::Request;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::io::Read;

use crate::errors::ServerError;

const MAX_BODY_BYTES: u64 = 1024 * 1024;

fn read_body(req: &mut Request) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("Failed to read request body: {e}")))?;
    Ok(buf)
}

/// Deserialize a JSON body. An empty body is treated as `{}`.
pub fn read_json<T: DeserializeOwned>(req: &mut Request) -> Result<T, ServerError> {
    let buf = read_body(req)?;
    let raw: &[u8] = if buf.iter().all(u8::is_ascii_whitespace) { b"{}" } else { &buf };
    serde_json::from_slice(raw).map_err(|e| ServerError::BadRequest(format!("Invalid JSON body: {e}")))
}

/// `application/x-www-form-urlencoded` fields, repeated keys kept in order.
pub struct Form(Vec<(String, String)>);

impl Form {
    pub fn read(req: &mut Request) -> Result<Self, ServerError> {
        let buf = read_body(req)?;
        Ok(Self(url::form_urlencoded::parse(&buf).into_owned().collect()))
    }

    /// First non-blank value for `key`, trimmed.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    pub fn get_all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, v)| k == key && !v.trim().is_empty())
            .map(|(_, v)| v.trim().to_string())
            .collect()
    }
}

pub fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Empty or missing values count as absent.
pub fn query_param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

pub fn parse_status(raw: Option<&str>) -> Result<Option<crate::domain::LeadStatus>, ServerError> {
    raw.map(|s| s.parse().map_err(ServerError::BadRequest)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LeadStatus;
    use astra::Body;

    fn post(body: &str) -> Request {
        http::Request::builder()
            .method("POST")
            .uri("/x?status=message_generated&limit=&q=plumbers+in%20austin")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn query_is_percent_decoded() {
        let params = parse_query(&post(""));
        assert_eq!(query_param(&params, "q"), Some("plumbers in austin"));
        assert_eq!(query_param(&params, "limit"), None);
        assert_eq!(
            parse_status(query_param(&params, "status")).unwrap(),
            Some(LeadStatus::MessageGenerated)
        );
    }

    #[test]
    fn unknown_status_is_a_bad_request() {
        assert_eq!(parse_status(Some("archived")).unwrap_err().status(), 400);
    }

    #[test]
    fn form_keeps_repeated_keys() {
        let form = Form::read(&mut post("leadIds=rec1&leadIds=rec2&leadIds=&subject=Hi+there")).unwrap();
        assert_eq!(form.get_all("leadIds"), vec!["rec1", "rec2"]);
        assert_eq!(form.get("subject"), Some("Hi there"));
        assert_eq!(form.get("missing"), None);
    }

    #[test]
    fn empty_json_body_reads_as_empty_object() {
        let v: serde_json::Value = read_json(&mut post("  ")).unwrap();
        assert!(v.as_object().unwrap().is_empty());
        let err = read_json::<serde_json::Value>(&mut post("{nope")).unwrap_err();
        assert_eq!(err.status(), 400);
    }
}
