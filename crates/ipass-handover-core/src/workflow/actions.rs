//! Action list manager.

use tracing::{debug, info};

use crate::db::Database;
use crate::models::{ActionItem, Authored, Priority, Provenance, TaskStatus};

use super::{not_found, require_text, WorkflowResult};

/// Owns the action items of every patient.
pub struct ActionListManager<'a> {
    db: &'a Database,
}

impl<'a> ActionListManager<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Add a user-authored pending item at the head of the pending list.
    pub fn add_item(
        &self,
        patient_id: &str,
        text: &str,
        priority: Priority,
        author: &str,
    ) -> WorkflowResult<ActionItem> {
        self.add_item_with_due(patient_id, text, priority, author, None)
    }

    /// Like [`add_item`](Self::add_item), with an optional timing hint.
    pub fn add_item_with_due(
        &self,
        patient_id: &str,
        text: &str,
        priority: Priority,
        author: &str,
        due_hint: Option<&str>,
    ) -> WorkflowResult<ActionItem> {
        let item = self.build(
            patient_id,
            text,
            priority,
            author,
            due_hint,
            Provenance::UserAuthored,
        )?;
        self.db.insert_action_item(&item)?;
        info!(
            patient_id,
            item_id = %item.id,
            priority = item.priority.as_str(),
            "action item added"
        );
        Ok(item)
    }

    /// Import an item from a prior shift as system-of-record.
    pub fn carry_over(
        &self,
        patient_id: &str,
        text: &str,
        priority: Priority,
        author: &str,
        due_hint: Option<&str>,
        status: TaskStatus,
    ) -> WorkflowResult<ActionItem> {
        let mut item = self.build(
            patient_id,
            text,
            priority,
            author,
            due_hint,
            Provenance::SystemOfRecord,
        )?;
        item.status = status;
        self.db.insert_action_item(&item)?;
        info!(patient_id, item_id = %item.id, "action item carried over");
        Ok(item)
    }

    /// Flip a user-authored item between pending and done.
    ///
    /// Carried-over items come back unchanged. Any actor may toggle a
    /// user-authored item.
    pub fn toggle_status(&self, item_id: &str, actor: &str) -> WorkflowResult<ActionItem> {
        self.toggle(item_id, actor, None)
    }

    /// Like [`toggle_status`](Self::toggle_status), rejecting the write with
    /// `Conflict` unless the stored item is still at `expected_version`.
    pub fn toggle_status_at(
        &self,
        item_id: &str,
        actor: &str,
        expected_version: u32,
    ) -> WorkflowResult<ActionItem> {
        self.toggle(item_id, actor, Some(expected_version))
    }

    /// Delete a user-authored item. Returns `false` for carried-over or unknown items.
    pub fn delete_item(&self, item_id: &str, actor: &str) -> WorkflowResult<bool> {
        let Some(item) = self.db.get_action_item(item_id)? else {
            debug!(item_id, actor, "delete of unknown action item ignored");
            return Ok(false);
        };

        match Authored::check(item) {
            Ok(authored) => self.remove(authored, actor),
            Err(item) => {
                debug!(item_id = %item.id, actor, "carried-over action item not deleted");
                Ok(false)
            }
        }
    }

    /// Pending items, newest first.
    pub fn list_pending(&self, patient_id: &str) -> WorkflowResult<Vec<ActionItem>> {
        Ok(self.db.list_action_items(patient_id, TaskStatus::Pending)?)
    }

    /// Done items, in completion order.
    pub fn list_done(&self, patient_id: &str) -> WorkflowResult<Vec<ActionItem>> {
        Ok(self.db.list_action_items(patient_id, TaskStatus::Done)?)
    }

    /// Pending items followed by done items.
    pub fn list_all(&self, patient_id: &str) -> WorkflowResult<Vec<ActionItem>> {
        let mut items = self.list_pending(patient_id)?;
        items.extend(self.list_done(patient_id)?);
        Ok(items)
    }

    fn build(
        &self,
        patient_id: &str,
        text: &str,
        priority: Priority,
        author: &str,
        due_hint: Option<&str>,
        provenance: Provenance,
    ) -> WorkflowResult<ActionItem> {
        let text = require_text("text", text)?;
        let author = require_text("author", author)?;
        let mut item = ActionItem::new(patient_id.to_string(), text, priority, author, provenance);
        item.due_hint = due_hint
            .map(str::trim)
            .filter(|hint| !hint.is_empty())
            .map(String::from);
        Ok(item)
    }

    fn toggle(
        &self,
        item_id: &str,
        actor: &str,
        expected_version: Option<u32>,
    ) -> WorkflowResult<ActionItem> {
        let item = self
            .db
            .get_action_item(item_id)?
            .ok_or_else(|| not_found("action_item", item_id))?;

        match Authored::check(item) {
            Ok(authored) => self.flip(authored, actor, expected_version),
            Err(item) => {
                debug!(item_id, actor, "carried-over action item not toggled");
                Ok(item)
            }
        }
    }

    fn flip(
        &self,
        item: Authored<ActionItem>,
        actor: &str,
        expected_version: Option<u32>,
    ) -> WorkflowResult<ActionItem> {
        let current = item.get();
        let next = current.status.flipped();
        let expected = expected_version.unwrap_or(current.version);

        self.db.update_action_status(&item, next, expected)?;
        info!(
            item_id = %current.id,
            actor,
            from = current.status.as_str(),
            to = next.as_str(),
            "action item toggled"
        );

        self.db
            .get_action_item(&current.id)?
            .ok_or_else(|| not_found("action_item", &current.id))
    }

    fn remove(&self, item: Authored<ActionItem>, actor: &str) -> WorkflowResult<bool> {
        let removed = self.db.delete_action_item(&item)?;
        let item = item.into_inner();
        if removed {
            info!(item_id = %item.id, patient_id = %item.patient_id, actor, "action item deleted");
        }
        Ok(removed)
    }
}
