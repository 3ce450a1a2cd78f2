//! Handover session and daily setup models.

use serde::{Deserialize, Serialize};

/// Phase of a handover session. Exactly one at a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Created, setup not yet looked up
    NotStarted,
    /// Waiting for the clinician to submit a daily setup
    DailySetupPending,
    /// Documentation in progress
    Active,
    /// Live exchange with the receiving clinician
    HandoverInProgress,
    /// Synthesis confirmed by the receiver (terminal)
    Completed,
    /// Abandoned before completion (terminal)
    Cancelled,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::NotStarted => "not_started",
            SessionState::DailySetupPending => "daily_setup_pending",
            SessionState::Active => "active",
            SessionState::HandoverInProgress => "handover_in_progress",
            SessionState::Completed => "completed",
            SessionState::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(SessionState::NotStarted),
            "daily_setup_pending" => Some(SessionState::DailySetupPending),
            "active" => Some(SessionState::Active),
            "handover_in_progress" => Some(SessionState::HandoverInProgress),
            "completed" => Some(SessionState::Completed),
            "cancelled" => Some(SessionState::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Cancelled)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shift worked by the clinician.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    Day,
    Evening,
    Night,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Day => "day",
            Shift::Evening => "evening",
            Shift::Night => "night",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" => Some(Shift::Day),
            "evening" => Some(Shift::Evening),
            "night" => Some(Shift::Night),
            _ => None,
        }
    }
}

/// A clinician's setup for one shift. Replaced wholesale on edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySetup {
    pub doctor_name: String,
    pub unit: String,
    pub shift: Shift,
    /// Assigned patient IDs; may be empty
    pub patient_ids: Vec<String>,
}

impl DailySetup {
    pub fn new(doctor_name: String, unit: String, shift: Shift) -> Self {
        Self {
            doctor_name,
            unit,
            shift,
            patient_ids: Vec::new(),
        }
    }

    /// First required field that is blank, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.doctor_name.trim().is_empty() {
            Some("doctor_name")
        } else if self.unit.trim().is_empty() {
            Some("unit")
        } else {
            None
        }
    }
}

/// One clinician's documentation and handover workflow for a shift.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandoverSession {
    pub id: String,
    /// Clinician handing over
    pub assigned_clinician: String,
    pub shift: Shift,
    pub state: SessionState,
    /// Patients in scope (from the daily setup)
    pub patient_ids: Vec<String>,
    /// Clinician who confirmed synthesis
    pub receiving_clinician: Option<String>,
    /// Patient the live handover is scoped to; `None` means whole assignment
    pub handover_patient_id: Option<String>,
    pub version: u32,
    pub started_at: String,
    pub updated_at: String,
}

impl HandoverSession {
    pub fn new(assigned_clinician: String, shift: Shift) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            assigned_clinician,
            shift,
            state: SessionState::NotStarted,
            patient_ids: Vec::new(),
            receiving_clinician: None,
            handover_patient_id: None,
            version: 1,
            started_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}
