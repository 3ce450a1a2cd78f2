//! Handover session controller.
//!
//! ```text
//! NotStarted ──begin──▶ DailySetupPending ──complete_setup──▶ Active
//!      │                        ▲                              │  ▲
//!      └──(setup on file)───────┼──────────────────────────────┘  │
//!                               └────────── change_setup ─────────┤
//!                                                                 │
//! Active ──start_handover──▶ HandoverInProgress ──close_handover──┘
//!                                   │
//!                                   └──confirm_synthesis──▶ Completed
//!
//! any non-terminal state ──cancel──▶ Cancelled
//! ```
//!
//! A transition either persists and updates the caller's session, or fails and
//! leaves both untouched.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::db::Database;
use crate::models::{DailySetup, HandoverSession, PresenceRole, SessionState, Shift};

use super::{not_found, require_text, PatientDirectory, PresenceFeed, WorkflowError, WorkflowResult};

/// Drives a session through its states.
pub struct SessionController<'a> {
    db: &'a Database,
    directory: &'a dyn PatientDirectory,
}

impl<'a> SessionController<'a> {
    /// Controller using the database's own patient table as directory.
    pub fn new(db: &'a Database) -> Self {
        Self { db, directory: db }
    }

    /// Controller with an external patient directory.
    pub fn with_directory(db: &'a Database, directory: &'a dyn PatientDirectory) -> Self {
        Self { db, directory }
    }

    /// Create a session in `NotStarted`.
    pub fn open_session(
        &self,
        assigned_clinician: &str,
        shift: Shift,
    ) -> WorkflowResult<HandoverSession> {
        let clinician = require_text("assigned_clinician", assigned_clinician)?;
        let session = HandoverSession::new(clinician, shift);
        self.db.insert_session(&session)?;
        info!(
            session_id = %session.id,
            clinician = %session.assigned_clinician,
            shift = shift.as_str(),
            "session opened"
        );
        Ok(session)
    }

    /// Load a stored session.
    pub fn load_session(&self, session_id: &str) -> WorkflowResult<HandoverSession> {
        self.db
            .get_session(session_id)?
            .ok_or_else(|| not_found("handover_session", session_id))
    }

    /// The clinician's setup on file for the session's shift.
    pub fn current_setup(&self, session: &HandoverSession) -> WorkflowResult<Option<DailySetup>> {
        Ok(self.db.get_daily_setup(&session.assigned_clinician, session.shift)?)
    }

    /// `NotStarted` → `DailySetupPending`, or straight to `Active` when a
    /// valid setup for this clinician and shift is already on file.
    pub fn begin(&self, session: &mut HandoverSession) -> WorkflowResult<()> {
        require_state(session, SessionState::NotStarted, "begin")?;

        let mut next = session.clone();
        match self.current_setup(session)? {
            Some(setup) if setup.missing_field().is_none() => {
                next.state = SessionState::Active;
                next.patient_ids = dedup(&setup.patient_ids);
            }
            _ => next.state = SessionState::DailySetupPending,
        }
        self.commit(session, next)
    }

    /// `DailySetupPending` → `Active`. The setup replaces any earlier one for
    /// the same clinician and shift, and its patients become the session scope.
    pub fn complete_setup(
        &self,
        session: &mut HandoverSession,
        setup: DailySetup,
    ) -> WorkflowResult<()> {
        require_state(session, SessionState::DailySetupPending, "complete setup")?;
        if let Some(field) = setup.missing_field() {
            warn!(session_id = %session.id, field, "daily setup rejected");
            return Err(WorkflowError::InvalidSetup { field });
        }

        let setup = DailySetup {
            doctor_name: setup.doctor_name.trim().to_string(),
            unit: setup.unit.trim().to_string(),
            shift: setup.shift,
            patient_ids: dedup(&setup.patient_ids),
        };

        let mut next = session.clone();
        next.state = SessionState::Active;
        next.shift = setup.shift;
        next.patient_ids = setup.patient_ids.clone();

        self.db.atomically(|db| -> WorkflowResult<()> {
            db.upsert_daily_setup(&session.assigned_clinician, &setup)?;
            self.persist(session, &mut next)
        })?;

        if setup.patient_ids.is_empty() {
            info!(session_id = %session.id, "setup has no assigned patients");
        }
        self.apply(session, next);
        Ok(())
    }

    /// `Active` → `DailySetupPending`. Returns the current setup as the edit
    /// baseline; it stays on file until a new one is submitted.
    pub fn change_setup(
        &self,
        session: &mut HandoverSession,
    ) -> WorkflowResult<Option<DailySetup>> {
        require_state(session, SessionState::Active, "change setup")?;
        let baseline = self.current_setup(session)?;

        let mut next = session.clone();
        next.state = SessionState::DailySetupPending;
        self.commit(session, next)?;
        Ok(baseline)
    }

    /// `Active` → `HandoverInProgress`, optionally scoped to one patient.
    pub fn start_handover(
        &self,
        session: &mut HandoverSession,
        patient_id: Option<&str>,
    ) -> WorkflowResult<()> {
        require_state(session, SessionState::Active, "start handover")?;

        if let Some(pid) = patient_id {
            if !session.patient_ids.iter().any(|p| p == pid) {
                warn!(
                    session_id = %session.id,
                    patient_id = pid,
                    "handover target not in assignment"
                );
                return Err(not_found("patient", pid));
            }
            self.directory.lookup_patient(pid)?;
        }

        let mut next = session.clone();
        next.state = SessionState::HandoverInProgress;
        next.handover_patient_id = patient_id.map(String::from);
        self.commit(session, next)
    }

    /// `HandoverInProgress` → `Active` without completing.
    pub fn close_handover(&self, session: &mut HandoverSession) -> WorkflowResult<()> {
        require_state(session, SessionState::HandoverInProgress, "close handover")?;

        let mut next = session.clone();
        next.state = SessionState::Active;
        next.handover_patient_id = None;
        self.commit(session, next)
    }

    /// `HandoverInProgress` → `Completed`.
    ///
    /// `receiving_clinician` must appear in `feed` with the receiving role.
    /// A feed error or a response slower than `timeout` fails with
    /// `PresenceUnavailable`.
    pub fn confirm_synthesis(
        &self,
        session: &mut HandoverSession,
        receiving_clinician: &str,
        feed: &dyn PresenceFeed,
        timeout: Duration,
    ) -> WorkflowResult<()> {
        require_state(session, SessionState::HandoverInProgress, "confirm synthesis")?;

        let receiver = receiving_clinician.trim();
        if receiver.is_empty() || receiver == session.assigned_clinician {
            warn!(session_id = %session.id, "synthesis without a distinct receiver");
            return Err(WorkflowError::NoReceiver {
                session_id: session.id.clone(),
            });
        }

        let started = Instant::now();
        let present = feed
            .active_presence(&session.id, timeout)
            .map_err(|e| WorkflowError::PresenceUnavailable {
                session_id: session.id.clone(),
                reason: e.to_string(),
            })?;
        let elapsed = started.elapsed();
        if elapsed > timeout {
            warn!(
                session_id = %session.id,
                elapsed_ms = elapsed.as_millis() as u64,
                "presence feed too slow"
            );
            return Err(WorkflowError::PresenceUnavailable {
                session_id: session.id.clone(),
                reason: format!("no response within {:?}", timeout),
            });
        }

        let receiver_present = present.iter().any(|p| {
            p.session_id == session.id
                && p.clinician_id == receiver
                && p.role == PresenceRole::Receiving
        });
        if !receiver_present {
            warn!(session_id = %session.id, receiver, "receiving clinician not present");
            return Err(WorkflowError::NoReceiver {
                session_id: session.id.clone(),
            });
        }

        let mut next = session.clone();
        next.state = SessionState::Completed;
        next.receiving_clinician = Some(receiver.to_string());
        self.commit(session, next)
    }

    /// Any non-terminal state → `Cancelled`.
    pub fn cancel(&self, session: &mut HandoverSession) -> WorkflowResult<()> {
        if session.state.is_terminal() {
            return Err(invalid(session, "cancel"));
        }
        let mut next = session.clone();
        next.state = SessionState::Cancelled;
        self.commit(session, next)
    }

    fn commit(
        &self,
        session: &mut HandoverSession,
        mut next: HandoverSession,
    ) -> WorkflowResult<()> {
        self.persist(session, &mut next)?;
        self.apply(session, next);
        Ok(())
    }

    /// Write `next` against the version the caller holds.
    fn persist(&self, session: &HandoverSession, next: &mut HandoverSession) -> WorkflowResult<()> {
        next.touch();
        self.db.update_session(next, session.version)?;
        next.version = session.version + 1;
        Ok(())
    }

    fn apply(&self, session: &mut HandoverSession, next: HandoverSession) {
        info!(
            session_id = %session.id,
            from = session.state.as_str(),
            to = next.state.as_str(),
            "session transition"
        );
        *session = next;
    }
}

fn require_state(
    session: &HandoverSession,
    expected: SessionState,
    action: &'static str,
) -> WorkflowResult<()> {
    if session.state != expected {
        return Err(invalid(session, action));
    }
    Ok(())
}

fn invalid(session: &HandoverSession, action: &'static str) -> WorkflowError {
    warn!(session_id = %session.id, state = session.state.as_str(), action, "invalid transition");
    WorkflowError::InvalidTransition {
        from: session.state,
        action,
    }
}

/// Drop blank and repeated IDs, keeping first occurrence order.
fn dedup(ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim();
        if !id.is_empty() && !out.iter().any(|seen| seen == id) {
            out.push(id.to_string());
        }
    }
    out
}
