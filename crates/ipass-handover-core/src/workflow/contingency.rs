//! Contingency plan manager.

use tracing::{debug, info};

use crate::db::Database;
use crate::models::{Authored, ContingencyPlan, PlanStatus, Priority, Provenance};

use super::{not_found, require_text, WorkflowError, WorkflowResult};

/// Owns the IF/THEN plans of every patient.
pub struct ContingencyPlanManager<'a> {
    db: &'a Database,
}

impl<'a> ContingencyPlanManager<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Add a user-authored plan at the head of its status bucket.
    pub fn add_plan(
        &self,
        patient_id: &str,
        condition: &str,
        action: &str,
        priority: Priority,
        status: PlanStatus,
        author: &str,
    ) -> WorkflowResult<ContingencyPlan> {
        let plan = self.build(
            patient_id,
            condition,
            action,
            priority,
            status,
            author,
            Provenance::UserAuthored,
        )?;
        self.db.insert_contingency_plan(&plan)?;
        info!(
            patient_id,
            plan_id = %plan.id,
            status = plan.status.as_str(),
            "contingency plan added"
        );
        Ok(plan)
    }

    /// Import a plan from a prior shift as system-of-record.
    pub fn carry_over(
        &self,
        patient_id: &str,
        condition: &str,
        action: &str,
        priority: Priority,
        status: PlanStatus,
        author: &str,
    ) -> WorkflowResult<ContingencyPlan> {
        let plan = self.build(
            patient_id,
            condition,
            action,
            priority,
            status,
            author,
            Provenance::SystemOfRecord,
        )?;
        self.db.insert_contingency_plan(&plan)?;
        info!(patient_id, plan_id = %plan.id, "contingency plan carried over");
        Ok(plan)
    }

    /// Delete a user-authored plan. Returns `false` for carried-over or unknown plans.
    pub fn delete_plan(&self, plan_id: &str) -> WorkflowResult<bool> {
        let Some(plan) = self.db.get_contingency_plan(plan_id)? else {
            debug!(plan_id, "delete of unknown contingency plan ignored");
            return Ok(false);
        };

        match Authored::check(plan) {
            Ok(authored) => {
                let removed = self.db.delete_contingency_plan(&authored)?;
                if removed {
                    let patient_id = &authored.get().patient_id;
                    info!(plan_id, patient_id = %patient_id, "contingency plan deleted");
                }
                Ok(removed)
            }
            Err(_) => {
                debug!(plan_id, "carried-over contingency plan not deleted");
                Ok(false)
            }
        }
    }

    /// Move a plan between `planned` and `active`.
    ///
    /// Allowed on carried-over plans too: status curation is not a content edit.
    pub fn change_status(
        &self,
        plan_id: &str,
        new_status: PlanStatus,
    ) -> WorkflowResult<ContingencyPlan> {
        self.set_status(plan_id, new_status, None)
    }

    /// Like [`change_status`](Self::change_status), rejecting the write with
    /// `Conflict` unless the stored plan is still at `expected_version`.
    pub fn change_status_at(
        &self,
        plan_id: &str,
        new_status: PlanStatus,
        expected_version: u32,
    ) -> WorkflowResult<ContingencyPlan> {
        self.set_status(plan_id, new_status, Some(expected_version))
    }

    /// Plans with `status`, newest first.
    pub fn list_by_status(
        &self,
        patient_id: &str,
        status: PlanStatus,
    ) -> WorkflowResult<Vec<ContingencyPlan>> {
        Ok(self.db.list_contingency_plans(patient_id, status)?)
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        &self,
        patient_id: &str,
        condition: &str,
        action: &str,
        priority: Priority,
        status: PlanStatus,
        author: &str,
        provenance: Provenance,
    ) -> WorkflowResult<ContingencyPlan> {
        let condition = condition.trim();
        let action = action.trim();
        if condition.is_empty() {
            return Err(WorkflowError::IncompleteCondition { missing: "condition" });
        }
        if action.is_empty() {
            return Err(WorkflowError::IncompleteCondition { missing: "action" });
        }
        let author = require_text("author", author)?;

        Ok(ContingencyPlan::new(
            patient_id.to_string(),
            condition.to_string(),
            action.to_string(),
            priority,
            status,
            author,
            provenance,
        ))
    }

    fn set_status(
        &self,
        plan_id: &str,
        new_status: PlanStatus,
        expected_version: Option<u32>,
    ) -> WorkflowResult<ContingencyPlan> {
        let plan = self
            .db
            .get_contingency_plan(plan_id)?
            .ok_or_else(|| not_found("contingency_plan", plan_id))?;

        let expected = expected_version.unwrap_or(plan.version);
        if plan.version != expected {
            return Err(WorkflowError::Conflict {
                entity: "contingency_plan",
                id: plan.id,
                expected,
            });
        }
        if plan.status == new_status {
            return Ok(plan);
        }

        self.db.update_contingency_status(&plan.id, new_status, expected)?;
        info!(
            plan_id,
            from = plan.status.as_str(),
            to = new_status.as_str(),
            carried_over = plan.provenance == Provenance::SystemOfRecord,
            "contingency plan status changed"
        );

        self.db
            .get_contingency_plan(plan_id)?
            .ok_or_else(|| not_found("contingency_plan", plan_id))
    }
}
