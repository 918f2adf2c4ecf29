// src/store/fields.rs
//
// Lead <-> spreadsheet row mapping for the legacy "Leads" table.
// Column names must match the table exactly; the API rejects unknown ones,
// so lead fields without a column (rank, closure flags, ...) are not persisted.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::list_field::{is_lossy, join_list, parse_list};
use crate::domain::{Lead, LeadPatch, LeadStatus};

pub const STATUS: &str = "Status";
pub const CREATED_AT: &str = "Created At";
pub const UPDATED_AT: &str = "Updated At";

type Fields = Map<String, Value>;

fn put_text(fields: &mut Fields, column: &str, value: &str) {
    if !value.trim().is_empty() {
        fields.insert(column.to_string(), Value::String(value.to_string()));
    }
}

fn put_list(fields: &mut Fields, column: &str, values: &[String]) {
    if is_lossy(values) {
        tracing::warn!(column, "list value contains the delimiter and will split on read");
    }
    put_text(fields, column, &join_list(values));
}

fn put_number<T: Into<serde_json::Number>>(fields: &mut Fields, column: &str, value: Option<T>) {
    if let Some(v) = value {
        fields.insert(column.to_string(), Value::Number(v.into()));
    }
}

fn put_float(fields: &mut Fields, column: &str, value: Option<f64>) {
    if let Some(n) = value.and_then(serde_json::Number::from_f64) {
        fields.insert(column.to_string(), Value::Number(n));
    }
}

fn put_time(fields: &mut Fields, column: &str, value: Option<DateTime<Utc>>) {
    if let Some(t) = value {
        fields.insert(column.to_string(), Value::String(t.to_rfc3339()));
    }
}

/// Full row for a new record. Empty values are omitted rather than sent as "".
pub fn lead_to_fields(lead: &Lead, now: DateTime<Utc>) -> Fields {
    let mut f = Fields::new();

    put_text(&mut f, "Name", &lead.name);
    put_text(&mut f, "Phone", &lead.phone);
    put_text(&mut f, "Website", &lead.website);
    put_text(&mut f, "Address", &lead.address);
    put_text(&mut f, "City", &lead.city);
    put_text(&mut f, "PostalCode", &lead.postal_code);
    put_text(&mut f, "State", &lead.state);
    put_text(&mut f, "CountryCode", &lead.country_code);
    put_text(&mut f, "CategoryName", &lead.category_name);
    put_text(&mut f, "Neighborhood", &lead.neighborhood);
    put_text(&mut f, "Street", &lead.street);
    put_float(&mut f, "Latitude", lead.latitude);
    put_float(&mut f, "Longitude", lead.longitude);
    put_float(&mut f, "TotalScore", lead.total_score);
    put_text(&mut f, "PlaceId", &lead.place_id);
    put_number(&mut f, "ReviewsCount", lead.reviews_count);
    put_number(&mut f, "ImagesCount", lead.images_count);
    put_text(&mut f, "ImageUrl", &lead.image_url);
    put_text(&mut f, "Domain", &lead.domain);
    put_list(&mut f, "Emails", &lead.emails);
    for (column, values) in lead.social.columns() {
        put_list(&mut f, column, values);
    }

    f.insert(STATUS.into(), Value::String(lead.status.as_str().into()));
    put_text(&mut f, "Message", &lead.message);
    put_time(&mut f, "Sent At", lead.sent_at);
    put_time(&mut f, "Replied At", lead.replied_at);
    put_time(&mut f, CREATED_AT, Some(now));
    put_time(&mut f, UPDATED_AT, Some(now));
    f
}

/// Only the keys the caller supplied, plus a fresh "Updated At".
/// Supplied-but-empty strings are sent, so a field can be cleared on purpose.
pub fn patch_to_fields(patch: &LeadPatch, now: DateTime<Utc>) -> Fields {
    let mut f = Fields::new();
    let mut put = |column: &str, value: &Option<String>| {
        if let Some(v) = value {
            f.insert(column.to_string(), Value::String(v.clone()));
        }
    };

    put("Name", &patch.name);
    put("Phone", &patch.phone);
    put("Website", &patch.website);
    put("Address", &patch.address);
    put("City", &patch.city);
    put("State", &patch.state);
    put("PostalCode", &patch.postal_code);
    put("Message", &patch.message);

    if let Some(emails) = &patch.emails {
        f.insert("Emails".into(), Value::String(join_list(emails)));
    }
    if let Some(status) = patch.status {
        f.insert(STATUS.into(), Value::String(status.as_str().into()));
    }
    put_time(&mut f, "Sent At", patch.sent_at);
    put_time(&mut f, "Replied At", patch.replied_at);
    put_time(&mut f, UPDATED_AT, Some(now));
    f
}

fn text(fields: &Fields, column: &str) -> String {
    match fields.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn float(fields: &Fields, column: &str) -> Option<f64> {
    match fields.get(column)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn int(fields: &Fields, column: &str) -> Option<i64> {
    float(fields, column).map(|v| v as i64)
}

fn time(fields: &Fields, column: &str) -> Option<DateTime<Utc>> {
    fields
        .get(column)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

/// Rebuild a lead from a stored row. Unknown status strings fall back to `sourced`
/// so one bad cell doesn't hide the row from the dashboard.
pub fn lead_from_fields(id: &str, fields: &Fields, created_time: Option<&str>) -> Lead {
    let status_raw = text(fields, STATUS);
    let status = status_raw.parse::<LeadStatus>().unwrap_or_else(|_| {
        if !status_raw.is_empty() {
            tracing::warn!(lead_id = id, status = %status_raw, "unknown status in store");
        }
        LeadStatus::Sourced
    });

    let mut lead = Lead {
        id: Some(id.to_string()),
        name: text(fields, "Name"),
        phone: text(fields, "Phone"),
        website: text(fields, "Website"),
        domain: text(fields, "Domain"),
        emails: parse_list(&text(fields, "Emails")),
        address: text(fields, "Address"),
        street: text(fields, "Street"),
        neighborhood: text(fields, "Neighborhood"),
        city: text(fields, "City"),
        state: text(fields, "State"),
        postal_code: text(fields, "PostalCode"),
        country_code: text(fields, "CountryCode"),
        latitude: float(fields, "Latitude"),
        longitude: float(fields, "Longitude"),
        category_name: text(fields, "CategoryName"),
        total_score: float(fields, "TotalScore"),
        reviews_count: int(fields, "ReviewsCount"),
        images_count: int(fields, "ImagesCount"),
        place_id: text(fields, "PlaceId"),
        image_url: text(fields, "ImageUrl"),
        status,
        message: text(fields, "Message"),
        sent_at: time(fields, "Sent At"),
        replied_at: time(fields, "Replied At"),
        created_at: time(fields, CREATED_AT),
        updated_at: time(fields, UPDATED_AT),
        ..Default::default()
    };

    for (column, _) in crate::domain::SocialLinks::default().columns() {
        let values = parse_list(&text(fields, column));
        if let Some(slot) = lead.social.column_mut(column) {
            *slot = values;
        }
    }

    if lead.created_at.is_none() {
        lead.created_at = created_time
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));
    }
    lead
}
