//! Database layer for the handover engine.

mod actions;
mod contingency;
mod patients;
mod presence;
mod schema;
mod sessions;
mod severity;

pub use schema::*;
#[allow(unused_imports)]
pub use patients::*;
#[allow(unused_imports)]
pub use actions::*;
#[allow(unused_imports)]
pub use contingency::*;
#[allow(unused_imports)]
pub use severity::*;
#[allow(unused_imports)]
pub use sessions::*;
#[allow(unused_imports)]
pub use presence::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Stale write on {entity} {id}: expected version {expected}")]
    Conflict {
        entity: &'static str,
        id: String,
        expected: u32,
    },
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` inside one transaction; any error rolls everything back.
    ///
    /// Must not be nested.
    pub fn atomically<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<DbError>,
    {
        let tx = self.conn.unchecked_transaction().map_err(DbError::from)?;
        let value = f(self)?;
        tx.commit().map_err(DbError::from)?;
        Ok(value)
    }

    /// Map an update that touched no rows to `Conflict` or `NotFound`.
    fn check_versioned_update(
        &self,
        rows_affected: usize,
        table: &str,
        entity: &'static str,
        id: &str,
        expected: u32,
    ) -> DbResult<()> {
        if rows_affected > 0 {
            return Ok(());
        }
        let exists: bool = self.conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", table),
            [id],
            |row| row.get(0),
        )?;
        if exists {
            Err(DbError::Conflict {
                entity,
                id: id.to_string(),
                expected,
            })
        } else {
            Err(DbError::NotFound(format!("{} {}", entity, id)))
        }
    }
}
