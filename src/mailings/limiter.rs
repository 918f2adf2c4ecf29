// mailings/limiter.rs
use chrono::{DateTime, Utc};
use rusqlite::TransactionBehavior;

use crate::config::SendLimits;
use crate::db::sends::{count_sends_since, delete_send, prune_sends, record_send, set_message_id};
use crate::db::Database;
use crate::store::StoreError;

const HOUR_SECS: i64 = 60 * 60;
const DAY_SECS: i64 = 24 * HOUR_SECS;

/// A ledger row held for one send in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation(i64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitDecision {
    Allowed(Reservation),
    Denied(String),
}

/// Sliding-window caps per sender, counted from the `email_sends` ledger so
/// they hold across restarts and across workers.
///
/// A send takes its slot up front with [`SendLimiter::reserve`], then either
/// [`confirm`](SendLimiter::confirm)s it or [`release`](SendLimiter::release)s it.
#[derive(Clone, Debug)]
pub struct SendLimiter {
    db: Database,
    limits: SendLimits,
}

impl SendLimiter {
    pub fn new(db: Database, limits: SendLimits) -> Self {
        Self { db, limits }
    }

    pub fn limits(&self) -> SendLimits {
        self.limits
    }

    /// Count both windows and claim a slot in one write transaction, so
    /// concurrent senders can never both see the last free slot.
    pub fn reserve(
        &self,
        sender: &str,
        lead_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<LimitDecision, StoreError> {
        let now = now.timestamp();
        let windows = [
            (self.limits.hourly, HOUR_SECS, "hourly"),
            (self.limits.daily, DAY_SECS, "daily"),
        ];

        self.db.with_conn(|conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(|e| StoreError::Db(format!("begin reservation failed: {e}")))?;

            for (limit, span, label) in windows {
                if limit == 0 {
                    continue;
                }
                let sent = count_sends_since(&tx, sender, now - span)?;
                if sent >= i64::from(limit) {
                    return Ok(LimitDecision::Denied(format!(
                        "Rate limit exceeded: {sent}/{limit} {label} emails sent"
                    )));
                }
            }

            prune_sends(&tx, now - DAY_SECS)?;
            let id = record_send(&tx, sender, lead_id, None, now)?;
            tx.commit()
                .map_err(|e| StoreError::Db(format!("commit reservation failed: {e}")))?;
            Ok(LimitDecision::Allowed(Reservation(id)))
        })
    }

    /// The send went out; keep the slot and note the provider's id.
    pub fn confirm(&self, reservation: Reservation, message_id: Option<&str>) -> Result<(), StoreError> {
        self.db.with_conn(|conn| set_message_id(conn, reservation.0, message_id))
    }

    /// The send failed; give the slot back.
    pub fn release(&self, reservation: Reservation) -> Result<(), StoreError> {
        self.db.with_conn(|conn| delete_send(conn, reservation.0))
    }
}
