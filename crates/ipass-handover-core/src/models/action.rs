//! Action list (task) models.

use serde::{Deserialize, Serialize};

use super::priority::Priority;
use super::provenance::{HasProvenance, Provenance};

/// Completion state of an action item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    /// The opposite partition.
    pub fn flipped(&self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Pending,
        }
    }
}

/// A task on a patient's action list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionItem {
    /// Unique item ID
    pub id: String,
    /// Patient this task belongs to
    pub patient_id: String,
    /// Task description
    pub text: String,
    pub priority: Priority,
    pub status: TaskStatus,
    /// Authoring clinician
    pub author: String,
    /// Free-text timing hint (e.g., "before 14:00", "q4h")
    pub due_hint: Option<String>,
    pub provenance: Provenance,
    /// Optimistic-concurrency counter, bumped on every write
    pub version: u32,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl ActionItem {
    /// Create a new pending item.
    pub fn new(
        patient_id: String,
        text: String,
        priority: Priority,
        author: String,
        provenance: Provenance,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            text,
            priority,
            status: TaskStatus::Pending,
            author,
            due_hint: None,
            provenance,
            version: 1,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    pub fn is_carried_over(&self) -> bool {
        self.provenance == Provenance::SystemOfRecord
    }
}

impl HasProvenance for ActionItem {
    fn provenance(&self) -> Provenance {
        self.provenance
    }
}
