//! Contingency plan database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Authored, ContingencyPlan, PlanStatus, Priority, Provenance};

const PLAN_COLUMNS: &str = "id, patient_id, condition, action, priority, status, author, \
                            provenance, version, created_at, updated_at";

impl Database {
    /// Insert a new plan at the head of its status bucket.
    pub fn insert_contingency_plan(&self, plan: &ContingencyPlan) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO contingency_plans (
                id, patient_id, condition, action, priority, status, author,
                provenance, version, order_seq, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9,
                (SELECT COALESCE(MAX(order_seq), 0) + 1 FROM contingency_plans),
                ?10, ?11
            )
            "#,
            params![
                plan.id,
                plan.patient_id,
                plan.condition,
                plan.action,
                plan.priority.as_str(),
                plan.status.as_str(),
                plan.author,
                plan.provenance.as_str(),
                plan.version,
                plan.created_at,
                plan.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Get a plan by ID.
    pub fn get_contingency_plan(&self, id: &str) -> DbResult<Option<ContingencyPlan>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM contingency_plans WHERE id = ?", PLAN_COLUMNS),
                [id],
                PlanRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Move a plan to `status` (head of the new bucket), if still at `expected_version`.
    pub fn update_contingency_status(
        &self,
        id: &str,
        status: PlanStatus,
        expected_version: u32,
    ) -> DbResult<()> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE contingency_plans SET
                status = ?2,
                version = version + 1,
                order_seq = (SELECT COALESCE(MAX(order_seq), 0) + 1 FROM contingency_plans),
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
            "contingency_plans",
            "contingency_plan",
            id,
            expected_version,
        )
    }

    /// Delete a user-authored plan.
    pub fn delete_contingency_plan(&self, plan: &Authored<ContingencyPlan>) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM contingency_plans WHERE id = ? AND provenance = 'user_authored'",
            [&plan.get().id],
        )?;
        Ok(rows_affected > 0)
    }

    /// List a patient's plans with `status`, newest first.
    pub fn list_contingency_plans(
        &self,
        patient_id: &str,
        status: PlanStatus,
    ) -> DbResult<Vec<ContingencyPlan>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM contingency_plans WHERE patient_id = ? AND status = ?
             ORDER BY order_seq DESC",
            PLAN_COLUMNS
        ))?;

        let rows = stmt.query_map(params![patient_id, status.as_str()], PlanRow::from_row)?;

        let mut plans = Vec::new();
        for row in rows {
            plans.push(row?.try_into()?);
        }
        Ok(plans)
    }
}

/// Intermediate row struct for database mapping.
struct PlanRow {
    id: String,
    patient_id: String,
    condition: String,
    action: String,
    priority: String,
    status: String,
    author: String,
    provenance: String,
    version: u32,
    created_at: String,
    updated_at: String,
}

impl PlanRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            condition: row.get(2)?,
            action: row.get(3)?,
            priority: row.get(4)?,
            status: row.get(5)?,
            author: row.get(6)?,
            provenance: row.get(7)?,
            version: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}

impl TryFrom<PlanRow> for ContingencyPlan {
    type Error = DbError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        Ok(ContingencyPlan {
            priority: Priority::parse(&row.priority)
                .ok_or_else(|| DbError::Constraint(format!("Unknown priority: {}", row.priority)))?,
            status: PlanStatus::parse(&row.status)
                .ok_or_else(|| {
                    DbError::Constraint(format!("Unknown plan status: {}", row.status))
                })?,
            provenance: Provenance::parse(&row.provenance).ok_or_else(|| {
                DbError::Constraint(format!("Unknown provenance: {}", row.provenance))
            })?,
            id: row.id,
            patient_id: row.patient_id,
            condition: row.condition,
            action: row.action,
            author: row.author,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
