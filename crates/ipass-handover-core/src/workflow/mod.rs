//! Handover documentation workflow.
//!
//! The [`SessionController`] sequences a shift (setup, documentation, live
//! handover, synthesis) and is the only component that changes session state.
//! The three record managers each own one patient-keyed collection and know
//! nothing about sessions:
//!
//! - [`SeverityTracker`]: append-only severity trail
//! - [`ActionListManager`]: pending/done tasks
//! - [`ContingencyPlanManager`]: IF/THEN plans by status
//!
//! Mutation of carried-over records goes through [`Authored::check`]; a
//! rejected toggle or delete is a silent no-op, never an error.
//!
//! [`Authored::check`]: crate::models::Authored::check

mod actions;
mod contingency;
mod directory;
mod presence;
mod session;
mod severity;

pub use actions::*;
pub use contingency::*;
pub use directory::*;
pub use presence::*;
pub use session::*;
pub use severity::*;

use thiserror::Error;

use crate::db::DbError;
use crate::models::SessionState;

/// Workflow errors.
///
/// Validation and state errors leave every record untouched; integration
/// errors (`PresenceUnavailable`, `Conflict`, `Database`) come from
/// collaborators and are passed through as-is.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("{field} must not be empty")]
    EmptyText { field: &'static str },

    #[error("Contingency plan is missing its {missing} clause")]
    IncompleteCondition { missing: &'static str },

    #[error("Invalid severity value: {0}")]
    InvalidSeverityValue(String),

    #[error("Daily setup is missing {field}")]
    InvalidSetup { field: &'static str },

    #[error("Cannot {action} while session is {from}")]
    InvalidTransition {
        from: SessionState,
        action: &'static str,
    },

    #[error("No receiving clinician present on session {session_id}")]
    NoReceiver { session_id: String },

    #[error("Presence unavailable for session {session_id}: {reason}")]
    PresenceUnavailable { session_id: String, reason: String },

    #[error("Stale write on {entity} {id}: expected version {expected}")]
    Conflict {
        entity: &'static str,
        id: String,
        expected: u32,
    },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Database error: {0}")]
    Database(DbError),
}

impl From<DbError> for WorkflowError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Conflict {
                entity,
                id,
                expected,
            } => WorkflowError::Conflict {
                entity,
                id,
                expected,
            },
            other => WorkflowError::Database(other),
        }
    }
}

impl From<serde_json::Error> for WorkflowError {
    fn from(e: serde_json::Error) -> Self {
        WorkflowError::Database(DbError::Json(e))
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Trim `value`, rejecting blank input as `EmptyText { field }`.
pub(crate) fn require_text(field: &'static str, value: &str) -> WorkflowResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WorkflowError::EmptyText { field });
    }
    Ok(trimmed.to_string())
}

fn not_found(entity: &'static str, id: &str) -> WorkflowError {
    WorkflowError::NotFound {
        entity,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_trims() {
        assert_eq!(require_text("text", "  Check O2 sat ").unwrap(), "Check O2 sat");
        assert!(matches!(
            require_text("text", " \t "),
            Err(WorkflowError::EmptyText { field: "text" })
        ));
    }

    #[test]
    fn test_conflict_passes_through() {
        let err: WorkflowError = DbError::Conflict {
            entity: "action_item",
            id: "a1".into(),
            expected: 3,
        }
        .into();
        assert!(matches!(
            err,
            WorkflowError::Conflict { entity: "action_item", expected: 3, .. }
        ));

        let err: WorkflowError = DbError::NotFound("x".into()).into();
        assert!(matches!(err, WorkflowError::Database(_)));
    }
}
