use crate::store::StoreError;
use rusqlite::{params, Connection};

/// Counts sends from `sender` at or after `since` (unix seconds).
pub fn count_sends_since(conn: &Connection, sender: &str, since: i64) -> Result<i64, StoreError> {
    let count: i64 = conn
        .query_row(
            "select count(*) from email_sends where sender = ? and sent_at >= ?",
            params![sender, since],
            |r| r.get(0),
        )
        .map_err(|e| StoreError::Db(format!("count sends failed: {e}")))?;

    Ok(count)
}

/// Inserts a ledger row and returns its rowid.
pub fn record_send(
    conn: &Connection,
    sender: &str,
    lead_id: Option<&str>,
    message_id: Option<&str>,
    now: i64,
) -> Result<i64, StoreError> {
    conn.execute(
        "insert into email_sends (sender, lead_id, message_id, sent_at) values (?, ?, ?, ?)",
        params![sender, lead_id, message_id, now],
    )
    .map_err(|e| StoreError::Db(format!("record send failed: {e}")))?;
    Ok(conn.last_insert_rowid())
}

pub fn set_message_id(conn: &Connection, id: i64, message_id: Option<&str>) -> Result<(), StoreError> {
    conn.execute(
        "update email_sends set message_id = ? where id = ?",
        params![message_id, id],
    )
    .map_err(|e| StoreError::Db(format!("update send failed: {e}")))?;
    Ok(())
}

pub fn delete_send(conn: &Connection, id: i64) -> Result<(), StoreError> {
    conn.execute("delete from email_sends where id = ?", params![id])
        .map_err(|e| StoreError::Db(format!("delete send failed: {e}")))?;
    Ok(())
}

/// Drops ledger rows older than `before`; the limiter never looks past a day.
pub fn prune_sends(conn: &Connection, before: i64) -> Result<usize, StoreError> {
    conn.execute("delete from email_sends where sent_at < ?", params![before])
        .map_err(|e| StoreError::Db(format!("prune sends failed: {e}")))
}
