//! Contingency plan (IF/THEN) models.

use serde::{Deserialize, Serialize};

use super::priority::Priority;
use super::provenance::{HasProvenance, Provenance};

/// Lifecycle of a contingency plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Documented, not yet in effect
    Planned,
    /// Currently in effect; receiving team should act on trigger
    Active,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Planned => "planned",
            PlanStatus::Active => "active",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Some(PlanStatus::Planned),
            "active" => Some(PlanStatus::Active),
            _ => None,
        }
    }
}

/// An IF/THEN rule for the receiving team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContingencyPlan {
    pub id: String,
    pub patient_id: String,
    /// IF clause
    pub condition: String,
    /// THEN clause
    pub action: String,
    pub priority: Priority,
    pub status: PlanStatus,
    /// Submitting clinician
    pub author: String,
    pub provenance: Provenance,
    pub version: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl ContingencyPlan {
    pub fn new(
        patient_id: String,
        condition: String,
        action: String,
        priority: Priority,
        status: PlanStatus,
        author: String,
        provenance: Provenance,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            condition,
            action,
            priority,
            status,
            author,
            provenance,
            version: 1,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Render as a single "IF ... THEN ..." line.
    pub fn rule_text(&self) -> String {
        format!("IF {} THEN {}", self.condition, self.action)
    }
}

impl HasProvenance for ContingencyPlan {
    fn provenance(&self) -> Provenance {
        self.provenance
    }
}
