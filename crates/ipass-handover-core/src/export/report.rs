//! I-PASS handover report: one section per patient in the session scope.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{
    verify_chain, ActionItem, AssessmentRecord, ContingencyPlan, HandoverSession, Patient,
    PlanStatus, Priority, SessionState, TaskStatus,
};
use crate::workflow::WorkflowResult;

/// Report format version.
pub const REPORT_FORMAT_VERSION: &str = "1.0";

/// Full handover report for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandoverReport {
    pub metadata: ReportMetadata,
    pub patients: Vec<PatientHandover>,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub format_version: String,
    pub exported_at: String,
    pub session_id: String,
    pub session_state: SessionState,
    pub assigned_clinician: String,
    pub receiving_clinician: Option<String>,
    /// Set when the live handover was scoped to one patient
    pub handover_patient_id: Option<String>,
}

/// The I-PASS view of one patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientHandover {
    pub patient_id: String,
    /// `None` if the directory does not know this patient
    pub patient: Option<Patient>,
    /// Illness severity
    pub severity: Option<AssessmentRecord>,
    /// Whether the severity trail hash chain verified
    pub severity_trail_intact: bool,
    /// Action list
    pub pending_actions: Vec<ActionItem>,
    pub done_actions: Vec<ActionItem>,
    /// Count of high-priority tasks still pending
    pub open_high_priority: usize,
    /// Situation awareness / contingency planning
    pub active_plans: Vec<ContingencyPlan>,
    pub planned_plans: Vec<ContingencyPlan>,
}

impl HandoverReport {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Builds handover reports from the store.
pub struct HandoverReporter<'a> {
    db: &'a Database,
}

impl<'a> HandoverReporter<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Build the report for every patient in the session, or just the
    /// handover target while a scoped handover is in progress.
    ///
    /// Patients are ordered most acute first (unassessed last), keeping
    /// session order within ties.
    pub fn build(&self, session: &HandoverSession) -> WorkflowResult<HandoverReport> {
        let scope: Vec<&String> = match (&session.state, &session.handover_patient_id) {
            (SessionState::HandoverInProgress, Some(target)) => vec![target],
            _ => session.patient_ids.iter().collect(),
        };

        let mut patients = Vec::with_capacity(scope.len());
        for patient_id in scope {
            patients.push(self.patient_section(patient_id)?);
        }
        patients.sort_by_key(|p| Reverse(p.severity.as_ref().map(|s| s.value)));

        Ok(HandoverReport {
            metadata: ReportMetadata {
                format_version: REPORT_FORMAT_VERSION.to_string(),
                exported_at: chrono::Utc::now().to_rfc3339(),
                session_id: session.id.clone(),
                session_state: session.state,
                assigned_clinician: session.assigned_clinician.clone(),
                receiving_clinician: session.receiving_clinician.clone(),
                handover_patient_id: session.handover_patient_id.clone(),
            },
            patients,
        })
    }

    fn patient_section(&self, patient_id: &str) -> WorkflowResult<PatientHandover> {
        let trail = self.db.list_assessments(patient_id)?;
        let pending_actions = self.db.list_action_items(patient_id, TaskStatus::Pending)?;
        Ok(PatientHandover {
            patient_id: patient_id.to_string(),
            patient: self.db.get_patient(patient_id)?,
            severity_trail_intact: verify_chain(&trail),
            severity: trail.last().cloned(),
            open_high_priority: pending_actions
                .iter()
                .filter(|a| a.priority == Priority::High)
                .count(),
            pending_actions,
            done_actions: self.db.list_action_items(patient_id, TaskStatus::Done)?,
            active_plans: self.db.list_contingency_plans(patient_id, PlanStatus::Active)?,
            planned_plans: self.db.list_contingency_plans(patient_id, PlanStatus::Planned)?,
        })
    }
}
