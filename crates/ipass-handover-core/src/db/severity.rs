//! Severity audit trail database operations (append-only).

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{AssessmentRecord, Severity};

const ASSESSMENT_COLUMNS: &str = "id, patient_id, value, set_by, recorded_at, seq, prev_hash, hash";

impl Database {
    /// Append an entry to a patient's trail.
    ///
    /// `UNIQUE (patient_id, seq)` rejects an entry built from a stale tail.
    pub fn append_assessment(&self, record: &AssessmentRecord) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO severity_assessments (
                id, patient_id, value, set_by, recorded_at, seq, prev_hash, hash
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.id,
                record.patient_id,
                record.value.as_str(),
                record.set_by,
                record.recorded_at,
                record.seq,
                record.prev_hash,
                record.hash,
            ],
        )?;
        Ok(())
    }

    /// Most recent entry for a patient.
    pub fn latest_assessment(&self, patient_id: &str) -> DbResult<Option<AssessmentRecord>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {} FROM severity_assessments WHERE patient_id = ?
                     ORDER BY seq DESC LIMIT 1",
                    ASSESSMENT_COLUMNS
                ),
                [patient_id],
                AssessmentRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Full trail for a patient, oldest first.
    pub fn list_assessments(&self, patient_id: &str) -> DbResult<Vec<AssessmentRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM severity_assessments WHERE patient_id = ? ORDER BY seq ASC",
            ASSESSMENT_COLUMNS
        ))?;

        let rows = stmt.query_map([patient_id], AssessmentRow::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.try_into()?);
        }
        Ok(records)
    }
}

struct AssessmentRow {
    id: String,
    patient_id: String,
    value: String,
    set_by: String,
    recorded_at: String,
    seq: u32,
    prev_hash: String,
    hash: String,
}

impl AssessmentRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            value: row.get(2)?,
            set_by: row.get(3)?,
            recorded_at: row.get(4)?,
            seq: row.get(5)?,
            prev_hash: row.get(6)?,
            hash: row.get(7)?,
        })
    }
}

impl TryFrom<AssessmentRow> for AssessmentRecord {
    type Error = DbError;

    fn try_from(row: AssessmentRow) -> Result<Self, Self::Error> {
        let value = Severity::parse(&row.value)
            .ok_or_else(|| DbError::Constraint(format!("Unknown severity: {}", row.value)))?;
        Ok(AssessmentRecord {
            id: row.id,
            patient_id: row.patient_id,
            value,
            set_by: row.set_by,
            recorded_at: row.recorded_at,
            seq: row.seq,
            prev_hash: row.prev_hash,
            hash: row.hash,
        })
    }
}
