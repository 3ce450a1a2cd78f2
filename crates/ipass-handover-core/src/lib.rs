//! I-PASS Handover Core Library
//!
//! Shift-handover documentation engine built around I-PASS (Illness severity,
//! Patient summary, Action list, Situation awareness, Synthesis).
//!
//! # Architecture
//!
//! ```text
//!                      ┌────────────────────────────┐
//!                      │   SessionController        │
//!                      │ setup → active → handover  │
//!                      │        → completed         │
//!                      └──────┬──────────────┬──────┘
//!                             │              │
//!          ┌──────────────────┼──────┐   PresenceFeed / PatientDirectory
//!          ▼                  ▼      ▼        (external collaborators)
//!   SeverityTracker   ActionListManager   ContingencyPlanManager
//!   (append-only,     (pending/done,      (planned/active,
//!    hash-chained)     provenance-gated)   provenance-gated)
//!          │                  │                   │
//!          └──────────────────┴─────────┬─────────┘
//!                                       ▼
//!                              SQLite (Database)
//! ```
//!
//! # Core Principle
//!
//! **Carried-over records are read-only.** Entries with system-of-record
//! provenance are never deleted or content-edited, and their tasks are never
//! toggled; attempts are silent no-ops.
//!
//! # Modules
//!
//! - [`db`]: SQLite persistence
//! - [`models`]: Domain types (ActionItem, ContingencyPlan, HandoverSession, etc.)
//! - [`workflow`]: Trackers, managers and the session state machine
//! - [`export`]: I-PASS handover report
//! - [`config`]: TOML engine configuration

pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod workflow;

// Re-export commonly used types
pub use config::EngineConfig;
pub use db::Database;
pub use export::{HandoverReport, HandoverReporter};
pub use models::{
    ActionItem, AssessmentRecord, Authored, ContingencyPlan, DailySetup, HandoverSession, Patient,
    PlanStatus, Presence, PresenceRole, Priority, Provenance, SessionState, Severity, Shift,
    TaskStatus,
};
pub use workflow::{
    ActionListManager, ContingencyPlanManager, DbPresenceFeed, PatientDirectory, PresenceFeed,
    SessionController, SeverityTracker, WorkflowError,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::Path;
use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

/// Error surfaced to host applications.
///
/// `kind` is a stable snake_case identifier (e.g. `empty_text`,
/// `no_receiver`) a host can map to a localized message.
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum HandoverError {
    #[error("Invalid {field} ({kind}): {message}")]
    Validation {
        kind: String,
        field: String,
        message: String,
    },

    #[error("Invalid session state ({kind}): {message}")]
    InvalidState {
        kind: String,
        session_id: Option<String>,
        message: String,
    },

    #[error("Presence unavailable for session {session_id}: {reason}")]
    PresenceUnavailable { session_id: String, reason: String },

    #[error("Conflict on {entity} {id}: expected version {expected_version}")]
    Conflict {
        entity: String,
        id: String,
        expected_version: u32,
    },

    #[error("Not found: {entity} {id}")]
    NotFound { entity: String, id: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl HandoverError {
    fn validation(kind: &str, field: &str, message: String) -> Self {
        HandoverError::Validation {
            kind: kind.to_string(),
            field: field.to_string(),
            message,
        }
    }

    /// Attach the session ID to state errors raised without one.
    fn for_session(self, id: &str) -> Self {
        match self {
            HandoverError::InvalidState {
                kind,
                session_id: None,
                message,
            } => HandoverError::InvalidState {
                kind,
                session_id: Some(id.to_string()),
                message,
            },
            other => other,
        }
    }
}

impl From<WorkflowError> for HandoverError {
    fn from(e: WorkflowError) -> Self {
        let message = e.to_string();
        match e {
            WorkflowError::EmptyText { field } => {
                HandoverError::validation("empty_text", field, message)
            }
            WorkflowError::IncompleteCondition { missing } => {
                HandoverError::validation("incomplete_condition", missing, message)
            }
            WorkflowError::InvalidSeverityValue(_) => {
                HandoverError::validation("invalid_severity_value", "value", message)
            }
            WorkflowError::InvalidSetup { field } => {
                HandoverError::validation("invalid_setup", field, message)
            }
            WorkflowError::InvalidTransition { .. } => HandoverError::InvalidState {
                kind: "invalid_transition".into(),
                session_id: None,
                message,
            },
            WorkflowError::NoReceiver { session_id } => HandoverError::InvalidState {
                kind: "no_receiver".into(),
                session_id: Some(session_id),
                message,
            },
            WorkflowError::PresenceUnavailable { session_id, reason } => {
                HandoverError::PresenceUnavailable { session_id, reason }
            }
            WorkflowError::Conflict {
                entity,
                id,
                expected,
            } => HandoverError::Conflict {
                entity: entity.to_string(),
                id,
                expected_version: expected,
            },
            WorkflowError::NotFound { entity, id } => HandoverError::NotFound {
                entity: entity.to_string(),
                id,
            },
            WorkflowError::Database(db) => HandoverError::DatabaseError(db.to_string()),
        }
    }
}

impl From<db::DbError> for HandoverError {
    fn from(e: db::DbError) -> Self {
        WorkflowError::from(e).into()
    }
}

impl From<serde_json::Error> for HandoverError {
    fn from(e: serde_json::Error) -> Self {
        HandoverError::DatabaseError(format!("Serialization error: {}", e))
    }
}

impl<T> From<std::sync::PoisonError<T>> for HandoverError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        HandoverError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

fn parse_priority(value: &str) -> Result<Priority, HandoverError> {
    Priority::parse(value).ok_or_else(|| {
        HandoverError::validation(
            "invalid_priority",
            "priority",
            format!("Unknown priority: {}", value),
        )
    })
}

fn parse_plan_status(value: &str) -> Result<PlanStatus, HandoverError> {
    PlanStatus::parse(value).ok_or_else(|| {
        HandoverError::validation(
            "invalid_plan_status",
            "status",
            format!("Unknown plan status: {}", value),
        )
    })
}

fn parse_shift(value: &str) -> Result<Shift, HandoverError> {
    Shift::parse(value).ok_or_else(|| {
        HandoverError::validation("invalid_shift", "shift", format!("Unknown shift: {}", value))
    })
}

fn parse_role(value: &str) -> Result<PresenceRole, HandoverError> {
    PresenceRole::parse(value).ok_or_else(|| {
        HandoverError::validation("invalid_role", "role", format!("Unknown role: {}", value))
    })
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<HandoverCore>, HandoverError> {
    let db = Database::open(&path)?;
    Ok(HandoverCore::wrap(db, EngineConfig::default()))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<HandoverCore>, HandoverError> {
    let db = Database::open_in_memory()?;
    Ok(HandoverCore::wrap(db, EngineConfig::default()))
}

/// Open the database named by a TOML config file (in-memory if it names none).
#[uniffi::export]
pub fn open_with_config(config_path: String) -> Result<Arc<HandoverCore>, HandoverError> {
    let config = EngineConfig::load(Path::new(&config_path))
        .map_err(|e| HandoverError::ConfigError(format!("{:#}", e)))?;
    let db = match &config.database.path {
        Some(path) => Database::open(path)?,
        None => Database::open_in_memory()?,
    };
    Ok(HandoverCore::wrap(db, config))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct HandoverCore {
    db: Arc<Mutex<Database>>,
    config: EngineConfig,
}

impl HandoverCore {
    fn wrap(db: Database, config: EngineConfig) -> Arc<Self> {
        Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            config,
        })
    }

    /// Load a session, run one transition on it, and return the result.
    fn transition<F>(&self, session_id: &str, f: F) -> Result<FfiSession, HandoverError>
    where
        F: FnOnce(&SessionController<'_>, &mut HandoverSession) -> Result<(), WorkflowError>,
    {
        let db = self.db.lock()?;
        let controller = SessionController::new(&db);
        let mut session = controller.load_session(session_id)?;
        f(&controller, &mut session).map_err(|e| HandoverError::from(e).for_session(session_id))?;
        Ok(session.into())
    }
}

#[uniffi::export]
impl HandoverCore {
    // =========================================================================
    // Patient Directory
    // =========================================================================

    /// Add or update a patient supplied by the host's directory.
    pub fn register_patient(&self, patient: FfiPatient) -> Result<(), HandoverError> {
        let db = self.db.lock()?;
        db.upsert_patient(&patient.into())?;
        Ok(())
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, patient_id: String) -> Result<Option<FfiPatient>, HandoverError> {
        let db = self.db.lock()?;
        Ok(db.get_patient(&patient_id)?.map(|p| p.into()))
    }

    // =========================================================================
    // Severity
    // =========================================================================

    /// Record a new severity assessment ("stable", "watcher"/"guarded", "unstable", "critical").
    pub fn set_severity(
        &self,
        patient_id: String,
        value: String,
        clinician: String,
    ) -> Result<FfiAssessment, HandoverError> {
        let db = self.db.lock()?;
        let record = SeverityTracker::new(&db).set_severity_str(&patient_id, &value, &clinician)?;
        Ok(record.into())
    }

    /// Current severity, if ever assessed.
    pub fn current_severity(
        &self,
        patient_id: String,
    ) -> Result<Option<FfiAssessment>, HandoverError> {
        let db = self.db.lock()?;
        Ok(SeverityTracker::new(&db).get_current(&patient_id)?.map(|r| r.into()))
    }

    /// Severity trail, oldest first.
    pub fn severity_history(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiAssessment>, HandoverError> {
        let db = self.db.lock()?;
        let history = SeverityTracker::new(&db).get_history(&patient_id)?;
        Ok(history.into_iter().map(|r| r.into()).collect())
    }

    /// Check the severity trail's hash chain.
    pub fn verify_severity_history(&self, patient_id: String) -> Result<bool, HandoverError> {
        let db = self.db.lock()?;
        Ok(SeverityTracker::new(&db).verify_history(&patient_id)?)
    }

    // =========================================================================
    // Action List
    // =========================================================================

    /// Add a task authored in this session.
    pub fn add_action_item(
        &self,
        patient_id: String,
        text: String,
        priority: String,
        author: String,
        due_hint: Option<String>,
    ) -> Result<FfiActionItem, HandoverError> {
        let priority = parse_priority(&priority)?;
        let db = self.db.lock()?;
        let item = ActionListManager::new(&db).add_item_with_due(
            &patient_id,
            &text,
            priority,
            &author,
            due_hint.as_deref(),
        )?;
        Ok(item.into())
    }

    /// Import a task from a prior shift (read-only thereafter).
    pub fn carry_over_action_item(
        &self,
        patient_id: String,
        text: String,
        priority: String,
        author: String,
        due_hint: Option<String>,
        done: bool,
    ) -> Result<FfiActionItem, HandoverError> {
        let priority = parse_priority(&priority)?;
        let status = if done { TaskStatus::Done } else { TaskStatus::Pending };
        let db = self.db.lock()?;
        let item = ActionListManager::new(&db).carry_over(
            &patient_id,
            &text,
            priority,
            &author,
            due_hint.as_deref(),
            status,
        )?;
        Ok(item.into())
    }

    /// Toggle pending/done. Pass `expected_version` to reject stale writes.
    pub fn toggle_action_item(
        &self,
        item_id: String,
        actor: String,
        expected_version: Option<u32>,
    ) -> Result<FfiActionItem, HandoverError> {
        let db = self.db.lock()?;
        let actions = ActionListManager::new(&db);
        let item = match expected_version {
            Some(v) => actions.toggle_status_at(&item_id, &actor, v)?,
            None => actions.toggle_status(&item_id, &actor)?,
        };
        Ok(item.into())
    }

    /// Delete a task. `false` if it was carried over or does not exist.
    pub fn delete_action_item(
        &self,
        item_id: String,
        actor: String,
    ) -> Result<bool, HandoverError> {
        let db = self.db.lock()?;
        Ok(ActionListManager::new(&db).delete_item(&item_id, &actor)?)
    }

    /// Pending tasks, newest first.
    pub fn list_pending_actions(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiActionItem>, HandoverError> {
        let db = self.db.lock()?;
        let items = ActionListManager::new(&db).list_pending(&patient_id)?;
        Ok(items.into_iter().map(|i| i.into()).collect())
    }

    /// Done tasks, in completion order.
    pub fn list_done_actions(
        &self,
        patient_id: String,
    ) -> Result<Vec<FfiActionItem>, HandoverError> {
        let db = self.db.lock()?;
        let items = ActionListManager::new(&db).list_done(&patient_id)?;
        Ok(items.into_iter().map(|i| i.into()).collect())
    }

    // =========================================================================
    // Contingency Plans
    // =========================================================================

    /// Add an IF/THEN plan authored in this session.
    pub fn add_contingency_plan(
        &self,
        patient_id: String,
        condition: String,
        action: String,
        priority: String,
        status: String,
        author: String,
    ) -> Result<FfiContingencyPlan, HandoverError> {
        let priority = parse_priority(&priority)?;
        let status = parse_plan_status(&status)?;
        let db = self.db.lock()?;
        let plan = ContingencyPlanManager::new(&db).add_plan(
            &patient_id,
            &condition,
            &action,
            priority,
            status,
            &author,
        )?;
        Ok(plan.into())
    }

    /// Import a plan from a prior shift.
    pub fn carry_over_contingency_plan(
        &self,
        patient_id: String,
        condition: String,
        action: String,
        priority: String,
        status: String,
        author: String,
    ) -> Result<FfiContingencyPlan, HandoverError> {
        let priority = parse_priority(&priority)?;
        let status = parse_plan_status(&status)?;
        let db = self.db.lock()?;
        let plan = ContingencyPlanManager::new(&db).carry_over(
            &patient_id,
            &condition,
            &action,
            priority,
            status,
            &author,
        )?;
        Ok(plan.into())
    }

    /// Delete a plan. `false` if it was carried over or does not exist.
    pub fn delete_contingency_plan(&self, plan_id: String) -> Result<bool, HandoverError> {
        let db = self.db.lock()?;
        Ok(ContingencyPlanManager::new(&db).delete_plan(&plan_id)?)
    }

    /// Move a plan between "planned" and "active".
    pub fn change_plan_status(
        &self,
        plan_id: String,
        status: String,
        expected_version: Option<u32>,
    ) -> Result<FfiContingencyPlan, HandoverError> {
        let status = parse_plan_status(&status)?;
        let db = self.db.lock()?;
        let plans = ContingencyPlanManager::new(&db);
        let plan = match expected_version {
            Some(v) => plans.change_status_at(&plan_id, status, v)?,
            None => plans.change_status(&plan_id, status)?,
        };
        Ok(plan.into())
    }

    /// Plans with the given status, newest first.
    pub fn list_plans_by_status(
        &self,
        patient_id: String,
        status: String,
    ) -> Result<Vec<FfiContingencyPlan>, HandoverError> {
        let status = parse_plan_status(&status)?;
        let db = self.db.lock()?;
        let plans = ContingencyPlanManager::new(&db).list_by_status(&patient_id, status)?;
        Ok(plans.into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Create a session for the clinician's shift ("day", "evening", "night").
    pub fn open_session(
        &self,
        clinician: String,
        shift: String,
    ) -> Result<FfiSession, HandoverError> {
        let shift = parse_shift(&shift)?;
        let db = self.db.lock()?;
        let session = SessionController::new(&db).open_session(&clinician, shift)?;
        Ok(session.into())
    }

    /// Get a session by ID.
    pub fn get_session(&self, session_id: String) -> Result<FfiSession, HandoverError> {
        let db = self.db.lock()?;
        Ok(SessionController::new(&db).load_session(&session_id)?.into())
    }

    /// Start the session; skips setup if one is on file.
    pub fn begin_session(&self, session_id: String) -> Result<FfiSession, HandoverError> {
        self.transition(&session_id, |c, s| c.begin(s))
    }

    /// Submit the daily setup.
    pub fn complete_setup(
        &self,
        session_id: String,
        setup: FfiDailySetup,
    ) -> Result<FfiSession, HandoverError> {
        let setup = DailySetup {
            doctor_name: setup.doctor_name,
            unit: setup.unit,
            shift: parse_shift(&setup.shift)?,
            patient_ids: setup.patient_ids,
        };
        self.transition(&session_id, |c, s| c.complete_setup(s, setup))
    }

    /// Return to setup; yields the current setup as edit baseline.
    pub fn change_setup(&self, session_id: String) -> Result<Option<FfiDailySetup>, HandoverError> {
        let db = self.db.lock()?;
        let controller = SessionController::new(&db);
        let mut session = controller.load_session(&session_id)?;
        let baseline = controller
            .change_setup(&mut session)
            .map_err(|e| HandoverError::from(e).for_session(&session_id))?;
        Ok(baseline.map(|s| s.into()))
    }

    /// Begin the live handover, optionally for one patient.
    pub fn start_handover(
        &self,
        session_id: String,
        patient_id: Option<String>,
    ) -> Result<FfiSession, HandoverError> {
        self.transition(&session_id, |c, s| c.start_handover(s, patient_id.as_deref()))
    }

    /// Leave the live handover without completing.
    pub fn close_handover(&self, session_id: String) -> Result<FfiSession, HandoverError> {
        self.transition(&session_id, |c, s| c.close_handover(s))
    }

    /// Record a presence heartbeat ("assigned", "receiving", "observer").
    pub fn record_presence(
        &self,
        session_id: String,
        clinician_id: String,
        role: String,
    ) -> Result<(), HandoverError> {
        let role = parse_role(&role)?;
        let db = self.db.lock()?;
        db.record_presence(&Presence::now(session_id, clinician_id, role))?;
        Ok(())
    }

    /// Complete the handover; the receiver must have a live heartbeat.
    pub fn confirm_synthesis(
        &self,
        session_id: String,
        receiving_clinician: String,
    ) -> Result<FfiSession, HandoverError> {
        let presence = &self.config.presence;
        let db = self.db.lock()?;
        let controller = SessionController::new(&db);
        let feed = DbPresenceFeed::new(&db, presence.stale_after());
        let mut session = controller.load_session(&session_id)?;
        controller
            .confirm_synthesis(&mut session, &receiving_clinician, &feed, presence.timeout())
            .map_err(|e| HandoverError::from(e).for_session(&session_id))?;
        Ok(session.into())
    }

    /// Abandon the session.
    pub fn cancel_session(&self, session_id: String) -> Result<FfiSession, HandoverError> {
        self.transition(&session_id, |c, s| c.cancel(s))
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// I-PASS handover report for the session as JSON.
    pub fn export_handover_report_json(&self, session_id: String) -> Result<String, HandoverError> {
        let db = self.db.lock()?;
        let session = SessionController::new(&db).load_session(&session_id)?;
        let report = HandoverReporter::new(&db).build(&session)?;
        Ok(report.to_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub age: Option<u32>,
    pub room: Option<String>,
    pub mrn: String,
    pub unit: String,
    pub assigned_physician: Option<String>,
    pub receiving_physician: Option<String>,
}

impl From<Patient> for FfiPatient {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            name: p.name,
            age: p.age,
            room: p.room,
            mrn: p.mrn,
            unit: p.unit,
            assigned_physician: p.assigned_physician,
            receiving_physician: p.receiving_physician,
        }
    }
}

impl From<FfiPatient> for Patient {
    fn from(p: FfiPatient) -> Self {
        Patient {
            id: p.id,
            name: p.name,
            age: p.age,
            room: p.room,
            mrn: p.mrn,
            unit: p.unit,
            assigned_physician: p.assigned_physician,
            receiving_physician: p.receiving_physician,
        }
    }
}

/// FFI-safe severity assessment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAssessment {
    pub id: String,
    pub patient_id: String,
    pub value: String,
    pub set_by: String,
    pub recorded_at: String,
    pub seq: u32,
    pub hash: String,
}

impl From<AssessmentRecord> for FfiAssessment {
    fn from(r: AssessmentRecord) -> Self {
        Self {
            id: r.id,
            patient_id: r.patient_id,
            value: r.value.as_str().to_string(),
            set_by: r.set_by,
            recorded_at: r.recorded_at,
            seq: r.seq,
            hash: r.hash,
        }
    }
}

/// FFI-safe action item.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiActionItem {
    pub id: String,
    pub patient_id: String,
    pub text: String,
    pub priority: String,
    pub done: bool,
    pub author: String,
    pub due_hint: Option<String>,
    /// True for carried-over (system-of-record) items
    pub read_only: bool,
    pub version: u32,
    pub created_at: String,
}

impl From<ActionItem> for FfiActionItem {
    fn from(item: ActionItem) -> Self {
        Self {
            read_only: item.is_carried_over(),
            done: item.status == TaskStatus::Done,
            priority: item.priority.as_str().to_string(),
            id: item.id,
            patient_id: item.patient_id,
            text: item.text,
            author: item.author,
            due_hint: item.due_hint,
            version: item.version,
            created_at: item.created_at,
        }
    }
}

/// FFI-safe contingency plan.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiContingencyPlan {
    pub id: String,
    pub patient_id: String,
    pub condition: String,
    pub action: String,
    pub priority: String,
    pub status: String,
    pub author: String,
    pub read_only: bool,
    pub version: u32,
    pub created_at: String,
}

impl From<ContingencyPlan> for FfiContingencyPlan {
    fn from(plan: ContingencyPlan) -> Self {
        Self {
            read_only: plan.provenance == Provenance::SystemOfRecord,
            priority: plan.priority.as_str().to_string(),
            status: plan.status.as_str().to_string(),
            id: plan.id,
            patient_id: plan.patient_id,
            condition: plan.condition,
            action: plan.action,
            author: plan.author,
            version: plan.version,
            created_at: plan.created_at,
        }
    }
}

/// FFI-safe daily setup.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDailySetup {
    pub doctor_name: String,
    pub unit: String,
    pub shift: String,
    pub patient_ids: Vec<String>,
}

impl From<DailySetup> for FfiDailySetup {
    fn from(setup: DailySetup) -> Self {
        Self {
            doctor_name: setup.doctor_name,
            unit: setup.unit,
            shift: setup.shift.as_str().to_string(),
            patient_ids: setup.patient_ids,
        }
    }
}

/// FFI-safe handover session.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSession {
    pub id: String,
    pub assigned_clinician: String,
    pub shift: String,
    pub state: String,
    pub patient_ids: Vec<String>,
    pub receiving_clinician: Option<String>,
    pub handover_patient_id: Option<String>,
    pub completed: bool,
    pub version: u32,
    pub started_at: String,
}

impl From<HandoverSession> for FfiSession {
    fn from(session: HandoverSession) -> Self {
        Self {
            completed: session.is_completed(),
            shift: session.shift.as_str().to_string(),
            state: session.state.as_str().to_string(),
            id: session.id,
            assigned_clinician: session.assigned_clinician,
            patient_ids: session.patient_ids,
            receiving_clinician: session.receiving_clinician,
            handover_patient_id: session.handover_patient_id,
            version: session.version,
            started_at: session.started_at,
        }
    }
}
