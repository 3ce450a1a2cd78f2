//! Patient directory database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::Patient;

const PATIENT_COLUMNS: &str =
    "id, name, age, room, mrn, unit, assigned_physician, receiving_physician";

impl Database {
    /// Insert or replace a patient record supplied by the directory.
    pub fn upsert_patient(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                id, name, age, room, mrn, unit, assigned_physician, receiving_physician
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                room = excluded.room,
                mrn = excluded.mrn,
                unit = excluded.unit,
                assigned_physician = excluded.assigned_physician,
                receiving_physician = excluded.receiving_physician
            "#,
            params![
                patient.id,
                patient.name,
                patient.age,
                patient.room,
                patient.mrn,
                patient.unit,
                patient.assigned_physician,
                patient.receiving_physician,
            ],
        )?;
        Ok(())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM patients WHERE id = ?", PATIENT_COLUMNS),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List patients on a unit, ordered by room then name.
    pub fn list_patients_in_unit(&self, unit: &str) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM patients WHERE unit = ? ORDER BY room, name",
            PATIENT_COLUMNS
        ))?;
        let patients = stmt
            .query_map([unit], patient_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(patients)
    }
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        room: row.get(3)?,
        mrn: row.get(4)?,
        unit: row.get(5)?,
        assigned_physician: row.get(6)?,
        receiving_physician: row.get(7)?,
    })
}
