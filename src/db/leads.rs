// src/db/leads.rs
use base64::Engine;
use chrono::{DateTime, Utc};
use rand::RngCore;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

use crate::db::connection::Database;
use crate::domain::{Lead, LeadPatch, LeadStatus, SocialLinks};
use crate::store::{LeadStore, StoreError};

const LEAD_COLUMNS: &str = r#"
    id, name, phone, phone_unformatted, website, domain, emails,
    address, street, neighborhood, city, state, postal_code, country_code,
    latitude, longitude, category_name, total_score, reviews_count, images_count,
    place_id, image_url, rank, claim_this_business, permanently_closed,
    temporarily_closed, is_advertisement, scraped_at, social,
    status, message, sent_at, replied_at, created_at, updated_at
"#;

/// Lead rows in the local SQLite file. List fields are stored as JSON arrays,
/// so values containing commas survive intact.
#[derive(Clone)]
pub struct SqliteLeadStore {
    db: Database,
}

impl SqliteLeadStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn generate_record_id() -> String {
    // 10 bytes = 80-bit id, url-safe base64 (no padding)
    let mut bytes = [0u8; 10];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!(
        "rec{}",
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    )
}

fn db_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::Db(e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Db(format!("encode list field: {e}")))
}

fn from_json<T: serde::de::DeserializeOwned + Default>(raw: &str) -> T {
    serde_json::from_str(raw).unwrap_or_default()
}

fn time_text(t: Option<DateTime<Utc>>) -> Option<String> {
    t.map(|t| t.to_rfc3339())
}

fn parse_time(raw: Option<String>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|t| t.with_timezone(&Utc))
}

fn lead_from_row(row: &Row) -> rusqlite::Result<Lead> {
    let emails: String = row.get("emails")?;
    let social: String = row.get("social")?;
    let status: String = row.get("status")?;

    Ok(Lead {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        phone: row.get("phone")?,
        phone_unformatted: row.get("phone_unformatted")?,
        website: row.get("website")?,
        domain: row.get("domain")?,
        emails: from_json(&emails),
        address: row.get("address")?,
        street: row.get("street")?,
        neighborhood: row.get("neighborhood")?,
        city: row.get("city")?,
        state: row.get("state")?,
        postal_code: row.get("postal_code")?,
        country_code: row.get("country_code")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        category_name: row.get("category_name")?,
        total_score: row.get("total_score")?,
        reviews_count: row.get("reviews_count")?,
        images_count: row.get("images_count")?,
        place_id: row.get("place_id")?,
        image_url: row.get("image_url")?,
        rank: row.get("rank")?,
        claim_this_business: row.get("claim_this_business")?,
        permanently_closed: row.get("permanently_closed")?,
        temporarily_closed: row.get("temporarily_closed")?,
        is_advertisement: row.get("is_advertisement")?,
        scraped_at: parse_time(row.get("scraped_at")?),
        social: from_json::<SocialLinks>(&social),
        status: status.parse().unwrap_or_default(),
        message: row.get("message")?,
        sent_at: parse_time(row.get("sent_at")?),
        replied_at: parse_time(row.get("replied_at")?),
        created_at: parse_time(row.get("created_at")?),
        updated_at: parse_time(row.get("updated_at")?),
    })
}

impl LeadStore for SqliteLeadStore {
    fn create(&self, lead: &Lead) -> Result<String, StoreError> {
        lead.validate().map_err(StoreError::Invalid)?;

        let id = generate_record_id();
        let now = Utc::now().to_rfc3339();
        let emails = to_json(&lead.emails)?;
        let social = to_json(&lead.social)?;

        self.db.with_conn(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO leads ({LEAD_COLUMNS}) VALUES (
                        ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                        ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28,
                        ?29, ?30, ?31, ?32, ?33, ?34, ?35)"
                ),
                params![
                    id,
                    lead.name,
                    lead.phone,
                    lead.phone_unformatted,
                    lead.website,
                    lead.domain,
                    emails,
                    lead.address,
                    lead.street,
                    lead.neighborhood,
                    lead.city,
                    lead.state,
                    lead.postal_code,
                    lead.country_code,
                    lead.latitude,
                    lead.longitude,
                    lead.category_name,
                    lead.total_score,
                    lead.reviews_count,
                    lead.images_count,
                    lead.place_id,
                    lead.image_url,
                    lead.rank,
                    lead.claim_this_business,
                    lead.permanently_closed,
                    lead.temporarily_closed,
                    lead.is_advertisement,
                    time_text(lead.scraped_at),
                    social,
                    lead.status.as_str(),
                    lead.message,
                    time_text(lead.sent_at),
                    time_text(lead.replied_at),
                    now,
                    now,
                ],
            )
            .map_err(|e| StoreError::Db(format!("Insert lead failed: {e}")))?;
            Ok(())
        })?;

        Ok(id)
    }

    fn update(&self, id: &str, patch: &LeadPatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            return Ok(());
        }
        patch.validate().map_err(StoreError::Invalid)?;

        let mut sets: Vec<&str> = Vec::new();
        let mut bind: Vec<SqlValue> = Vec::new();

        let text_fields = [
            ("name = ?", &patch.name),
            ("phone = ?", &patch.phone),
            ("website = ?", &patch.website),
            ("address = ?", &patch.address),
            ("city = ?", &patch.city),
            ("state = ?", &patch.state),
            ("postal_code = ?", &patch.postal_code),
            ("message = ?", &patch.message),
        ];
        for (set, value) in text_fields {
            if let Some(v) = value {
                sets.push(set);
                bind.push(SqlValue::Text(v.clone()));
            }
        }
        if let Some(emails) = &patch.emails {
            sets.push("emails = ?");
            bind.push(SqlValue::Text(to_json(emails)?));
        }
        if let Some(status) = patch.status {
            sets.push("status = ?");
            bind.push(SqlValue::Text(status.as_str().to_string()));
        }
        if let Some(t) = patch.sent_at {
            sets.push("sent_at = ?");
            bind.push(SqlValue::Text(t.to_rfc3339()));
        }
        if let Some(t) = patch.replied_at {
            sets.push("replied_at = ?");
            bind.push(SqlValue::Text(t.to_rfc3339()));
        }

        sets.push("updated_at = ?");
        bind.push(SqlValue::Text(Utc::now().to_rfc3339()));
        bind.push(SqlValue::Text(id.to_string()));

        let sql = format!("UPDATE leads SET {} WHERE id = ?", sets.join(", "));

        let changed = self.db.with_conn(|conn| {
            conn.execute(&sql, params_from_iter(bind.iter()))
                .map_err(|e| StoreError::Db(format!("Update lead failed: {e}")))
        })?;

        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn list(&self, status: Option<LeadStatus>, limit: Option<usize>) -> Result<Vec<Lead>, StoreError> {
        let mut sql = format!("SELECT {LEAD_COLUMNS} FROM leads");
        let mut bind: Vec<SqlValue> = Vec::new();

        if let Some(status) = status {
            sql.push_str(" WHERE status = ?");
            bind.push(SqlValue::Text(status.as_str().to_string()));
        }
        sql.push_str(" ORDER BY created_at DESC, rowid DESC");
        if let Some(limit) = limit {
            sql.push_str(" LIMIT ?");
            bind.push(SqlValue::Integer(limit as i64));
        }

        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql).map_err(db_err)?;
            let rows = stmt
                .query_map(params_from_iter(bind.iter()), lead_from_row)
                .map_err(db_err)?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r.map_err(db_err)?);
            }
            Ok(out)
        })
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Lead>, StoreError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"),
                params![id],
                lead_from_row,
            )
            .optional()
            .map_err(db_err)
        })
    }
}
