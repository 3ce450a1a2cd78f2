//! Presence heartbeat database operations.

use chrono::{DateTime, Duration, Utc};
use rusqlite::params;
use tracing::warn;

use super::{Database, DbResult};
use crate::models::{Presence, PresenceRole};

impl Database {
    /// Record (or refresh) a clinician's heartbeat on a session.
    pub fn record_presence(&self, presence: &Presence) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO presence (session_id, clinician_id, role, last_seen)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(session_id, clinician_id) DO UPDATE SET
                role = excluded.role,
                last_seen = excluded.last_seen
            "#,
            params![
                presence.session_id,
                presence.clinician_id,
                presence.role.as_str(),
                presence.last_seen,
            ],
        )?;
        Ok(())
    }

    /// Heartbeats on a session seen within `stale_after` of `now`.
    pub fn list_presence_since(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
        stale_after: Duration,
    ) -> DbResult<Vec<Presence>> {
        let cutoff = now
            .checked_sub_signed(stale_after)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut stmt = self.conn.prepare(
            r#"
            SELECT session_id, clinician_id, role, last_seen FROM presence
            WHERE session_id = ?
            ORDER BY clinician_id
            "#,
        )?;

        let rows = stmt.query_map([session_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut active = Vec::new();
        for row in rows {
            let (session_id, clinician_id, role, last_seen) = row?;
            let seen_at = match DateTime::parse_from_rfc3339(&last_seen) {
                Ok(t) => t.with_timezone(&Utc),
                Err(e) => {
                    warn!(
                        session_id = %session_id,
                        clinician_id = %clinician_id,
                        error = %e,
                        "unreadable heartbeat skipped"
                    );
                    continue;
                }
            };
            if seen_at < cutoff {
                continue;
            }
            let Some(role) = PresenceRole::parse(&role) else {
                warn!(
                    session_id = %session_id,
                    clinician_id = %clinician_id,
                    role = %role,
                    "unknown presence role skipped"
                );
                continue;
            };
            active.push(Presence {
                session_id,
                clinician_id,
                role,
                last_seen,
            });
        }
        Ok(active)
    }
}
