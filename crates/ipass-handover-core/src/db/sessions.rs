//! Handover session and daily setup database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{DailySetup, HandoverSession, SessionState, Shift};

const SESSION_COLUMNS: &str = "id, assigned_clinician, shift, state, patient_ids, \
    receiving_clinician, handover_patient_id, version, started_at, updated_at";

impl Database {
    /// Insert a new session.
    pub fn insert_session(&self, session: &HandoverSession) -> DbResult<()> {
        let patient_ids_json = serde_json::to_string(&session.patient_ids)?;
        self.conn.execute(
            r#"
            INSERT INTO handover_sessions (
                id, assigned_clinician, shift, state, patient_ids,
                receiving_clinician, handover_patient_id, version, started_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                session.id,
                session.assigned_clinician,
                session.shift.as_str(),
                session.state.as_str(),
                patient_ids_json,
                session.receiving_clinician,
                session.handover_patient_id,
                session.version,
                session.started_at,
                session.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Write `session` over the stored row if the stored version is `expected_version`.
    ///
    /// The stored version becomes `expected_version + 1`; callers set
    /// `session.version` to match only after this succeeds.
    pub fn update_session(&self, session: &HandoverSession, expected_version: u32) -> DbResult<()> {
        let patient_ids_json = serde_json::to_string(&session.patient_ids)?;
        let rows_affected = self.conn.execute(
            r#"
            UPDATE handover_sessions SET
                state = ?3,
                patient_ids = ?4,
                receiving_clinician = ?5,
                handover_patient_id = ?6,
                shift = ?8,
                version = version + 1,
                updated_at = ?7
            WHERE id = ?1 AND version = ?2
            "#,
            params![
                session.id,
                expected_version,
                session.state.as_str(),
                patient_ids_json,
                session.receiving_clinician,
                session.handover_patient_id,
                session.updated_at,
                session.shift.as_str(),
            ],
        )?;
        self.check_versioned_update(
            rows_affected,
            "handover_sessions",
            "handover_session",
            &session.id,
            expected_version,
        )
    }

    /// Get a session by ID.
    pub fn get_session(&self, id: &str) -> DbResult<Option<HandoverSession>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM handover_sessions WHERE id = ?", SESSION_COLUMNS),
                [id],
                SessionRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Store a clinician's setup for a shift, replacing any previous one.
    pub fn upsert_daily_setup(&self, clinician: &str, setup: &DailySetup) -> DbResult<()> {
        let patient_ids_json = serde_json::to_string(&setup.patient_ids)?;
        self.conn.execute(
            r#"
            INSERT INTO daily_setups (clinician, shift, doctor_name, unit, patient_ids, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(clinician, shift) DO UPDATE SET
                doctor_name = excluded.doctor_name,
                unit = excluded.unit,
                patient_ids = excluded.patient_ids,
                updated_at = excluded.updated_at
            "#,
            params![
                clinician,
                setup.shift.as_str(),
                setup.doctor_name,
                setup.unit,
                patient_ids_json,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a clinician's setup for a shift.
    pub fn get_daily_setup(&self, clinician: &str, shift: Shift) -> DbResult<Option<DailySetup>> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT doctor_name, unit, patient_ids FROM daily_setups
                WHERE clinician = ? AND shift = ?
                "#,
                params![clinician, shift.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((doctor_name, unit, patient_ids)) => Ok(Some(DailySetup {
                doctor_name,
                unit,
                shift,
                patient_ids: serde_json::from_str(&patient_ids)?,
            })),
            None => Ok(None),
        }
    }
}

/// Intermediate row struct for database mapping.
struct SessionRow {
    id: String,
    assigned_clinician: String,
    shift: String,
    state: String,
    patient_ids: String,
    receiving_clinician: Option<String>,
    handover_patient_id: Option<String>,
    version: u32,
    started_at: String,
    updated_at: String,
}

impl SessionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            assigned_clinician: row.get(1)?,
            shift: row.get(2)?,
            state: row.get(3)?,
            patient_ids: row.get(4)?,
            receiving_clinician: row.get(5)?,
            handover_patient_id: row.get(6)?,
            version: row.get(7)?,
            started_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

impl TryFrom<SessionRow> for HandoverSession {
    type Error = DbError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let shift = Shift::parse(&row.shift)
            .ok_or_else(|| DbError::Constraint(format!("Unknown shift: {}", row.shift)))?;
        let state = SessionState::parse(&row.state)
            .ok_or_else(|| DbError::Constraint(format!("Unknown session state: {}", row.state)))?;

        Ok(HandoverSession {
            id: row.id,
            assigned_clinician: row.assigned_clinician,
            shift,
            state,
            patient_ids: serde_json::from_str(&row.patient_ids)?,
            receiving_clinician: row.receiving_clinician,
            handover_patient_id: row.handover_patient_id,
            version: row.version,
            started_at: row.started_at,
            updated_at: row.updated_at,
        })
    }
}
