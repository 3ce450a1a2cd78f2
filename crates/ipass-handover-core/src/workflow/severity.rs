//! Severity assessment tracker.

use tracing::info;

use crate::db::Database;
use crate::models::{verify_chain, AssessmentRecord, Severity};

use super::{require_text, WorkflowError, WorkflowResult};

/// Holds the current illness severity per patient plus its audit trail.
pub struct SeverityTracker<'a> {
    db: &'a Database,
}

impl<'a> SeverityTracker<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Append a new assessment; it becomes the patient's current value.
    pub fn set_severity(
        &self,
        patient_id: &str,
        value: Severity,
        clinician: &str,
    ) -> WorkflowResult<AssessmentRecord> {
        let clinician = require_text("clinician", clinician)?;

        let record = self.db.atomically(|db| -> WorkflowResult<AssessmentRecord> {
            let prev = db.latest_assessment(patient_id)?;
            let record = AssessmentRecord::next(
                patient_id.to_string(),
                value,
                clinician,
                prev.as_ref(),
            )?;
            db.append_assessment(&record)?;
            Ok(record)
        })?;

        info!(
            patient_id,
            severity = record.value.as_str(),
            seq = record.seq,
            "severity assessed"
        );
        Ok(record)
    }

    /// Parse `value` (e.g. from a form field) and append it.
    pub fn set_severity_str(
        &self,
        patient_id: &str,
        value: &str,
        clinician: &str,
    ) -> WorkflowResult<AssessmentRecord> {
        let severity = Severity::parse(value)
            .ok_or_else(|| WorkflowError::InvalidSeverityValue(value.to_string()))?;
        self.set_severity(patient_id, severity, clinician)
    }

    /// Latest assessment, or `None` if the patient was never assessed.
    pub fn get_current(&self, patient_id: &str) -> WorkflowResult<Option<AssessmentRecord>> {
        Ok(self.db.latest_assessment(patient_id)?)
    }

    /// Every assessment for the patient, oldest first.
    pub fn get_history(&self, patient_id: &str) -> WorkflowResult<Vec<AssessmentRecord>> {
        Ok(self.db.list_assessments(patient_id)?)
    }

    /// Recompute the hash chain over the patient's trail.
    pub fn verify_history(&self, patient_id: &str) -> WorkflowResult<bool> {
        let history = self.db.list_assessments(patient_id)?;
        Ok(verify_chain(&history))
    }
}
