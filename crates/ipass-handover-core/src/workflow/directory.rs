//! Patient directory seam.

use crate::db::Database;
use crate::models::Patient;

use super::{not_found, WorkflowResult};

/// Read-only source of patient identity.
pub trait PatientDirectory {
    /// Look up a patient, failing with `NotFound` if unknown.
    fn lookup_patient(&self, id: &str) -> WorkflowResult<Patient>;
}

impl PatientDirectory for Database {
    fn lookup_patient(&self, id: &str) -> WorkflowResult<Patient> {
        self.get_patient(id)?.ok_or_else(|| not_found("patient", id))
    }
}
