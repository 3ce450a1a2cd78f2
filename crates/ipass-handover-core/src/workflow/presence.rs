//! Collaboration presence seam.

use std::time::Duration;

use thiserror::Error;

use crate::db::Database;
use crate::models::Presence;

/// Failure reported by a presence source.
#[derive(Error, Debug)]
pub enum PresenceError {
    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Unavailable(String),
}

/// Source of "who is looking at this session right now".
pub trait PresenceFeed {
    /// Clinicians active on `session_id`. Implementations should give up
    /// after `timeout` and return [`PresenceError::Timeout`].
    fn active_presence(
        &self,
        session_id: &str,
        timeout: Duration,
    ) -> Result<Vec<Presence>, PresenceError>;
}

/// Presence backed by heartbeat rows in the local database.
pub struct DbPresenceFeed<'a> {
    db: &'a Database,
    stale_after: chrono::Duration,
}

impl<'a> DbPresenceFeed<'a> {
    /// Heartbeats older than `stale_after` are not considered present.
    pub fn new(db: &'a Database, stale_after: Duration) -> Self {
        Self {
            db,
            stale_after: chrono::Duration::from_std(stale_after).unwrap_or(chrono::Duration::MAX),
        }
    }
}

impl PresenceFeed for DbPresenceFeed<'_> {
    fn active_presence(
        &self,
        session_id: &str,
        _timeout: Duration,
    ) -> Result<Vec<Presence>, PresenceError> {
        self.db
            .list_presence_since(session_id, chrono::Utc::now(), self.stale_after)
            .map_err(|e| PresenceError::Unavailable(e.to_string()))
    }
}

/// A snapshot pushed by the host's transport layer.
impl PresenceFeed for Vec<Presence> {
    fn active_presence(
        &self,
        session_id: &str,
        _timeout: Duration,
    ) -> Result<Vec<Presence>, PresenceError> {
        Ok(self
            .iter()
            .filter(|p| p.session_id == session_id)
            .cloned()
            .collect())
    }
}
