//! Action item database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{ActionItem, Authored, Priority, Provenance, TaskStatus};

const ACTION_COLUMNS: &str = "id, patient_id, text, priority, status, author, due_hint, \
                              provenance, version, created_at, updated_at";

impl Database {
    /// Insert a new action item at the head of its partition.
    pub fn insert_action_item(&self, item: &ActionItem) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO action_items (
                id, patient_id, text, priority, status, author, due_hint,
                provenance, version, order_seq, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9,
                (SELECT COALESCE(MAX(order_seq), 0) + 1 FROM action_items),
                ?10, ?11
            )
            "#,
            params![
                item.id,
                item.patient_id,
                item.text,
                item.priority.as_str(),
                item.status.as_str(),
                item.author,
                item.due_hint,
                item.provenance.as_str(),
                item.version,
                item.created_at,
                item.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get an action item by ID.
    pub fn get_action_item(&self, id: &str) -> DbResult<Option<ActionItem>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM action_items WHERE id = ?", ACTION_COLUMNS),
                [id],
                ActionRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Move a user-authored item to `status`, if it is still at `expected_version`.
    ///
    /// The item lands at the head of its new partition and its version is bumped.
    pub fn update_action_status(
        &self,
        item: &Authored<ActionItem>,
        status: TaskStatus,
        expected_version: u32,
    ) -> DbResult<()> {
        let id = item.get().id.as_str();
        let rows_affected = self.conn.execute(
            r#"
            UPDATE action_items SET
                status = ?2,
                version = version + 1,
                order_seq = (SELECT COALESCE(MAX(order_seq), 0) + 1 FROM action_items),
                updated_at = ?4
            WHERE id = ?1 AND version = ?3
            "#,
            params![
                id,
                status.as_str(),
                expected_version,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        self.check_versioned_update(
            rows_affected,
            "action_items",
            "action_item",
            id,
            expected_version,
        )
    }

    /// Delete a user-authored action item.
    pub fn delete_action_item(&self, item: &Authored<ActionItem>) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM action_items WHERE id = ? AND provenance = 'user_authored'",
            [&item.get().id],
        )?;
        Ok(rows_affected > 0)
    }

    /// List a patient's items in one partition.
    ///
    /// Pending items come newest first; done items in the order they were completed.
    pub fn list_action_items(
        &self,
        patient_id: &str,
        status: TaskStatus,
    ) -> DbResult<Vec<ActionItem>> {
        let order = match status {
            TaskStatus::Pending => "DESC",
            TaskStatus::Done => "ASC",
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM action_items WHERE patient_id = ? AND status = ? ORDER BY order_seq {}",
            ACTION_COLUMNS, order
        ))?;

        let rows = stmt.query_map(params![patient_id, status.as_str()], ActionRow::from_row)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?.try_into()?);
        }
        Ok(items)
    }
}

/// Intermediate row struct for database mapping.
struct ActionRow {
    id: String,
    patient_id: String,
    text: String,
    priority: String,
    status: String,
    author: String,
    due_hint: Option<String>,
    provenance: String,
    version: u32,
    created_at: String,
    updated_at: String,
}

impl ActionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            text: row.get(2)?,
            priority: row.get(3)?,
            status: row.get(4)?,
            author: row.get(5)?,
            due_hint: row.get(6)?,
            provenance: row.get(7)?,
            version: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}

impl TryFrom<ActionRow> for ActionItem {
    type Error = DbError;

    fn try_from(row: ActionRow) -> Result<Self, Self::Error> {
        Ok(ActionItem {
            priority: Priority::parse(&row.priority)
                .ok_or_else(|| DbError::Constraint(format!("Unknown priority: {}", row.priority)))?,
            status: TaskStatus::parse(&row.status)
                .ok_or_else(|| {
                    DbError::Constraint(format!("Unknown task status: {}", row.status))
                })?,
            provenance: Provenance::parse(&row.provenance).ok_or_else(|| {
                DbError::Constraint(format!("Unknown provenance: {}", row.provenance))
            })?,
            id: row.id,
            patient_id: row.patient_id,
            text: row.text,
            author: row.author,
            due_hint: row.due_hint,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
