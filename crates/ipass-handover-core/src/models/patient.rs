//! Patient models.

use serde::{Deserialize, Serialize};

/// Patient identity and static context, as supplied by the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: Option<u32>,
    pub room: Option<String>,
    /// Medical record number
    pub mrn: String,
    /// Unit/ward (e.g., "picu")
    pub unit: String,
    pub assigned_physician: Option<String>,
    pub receiving_physician: Option<String>,
}

impl Patient {
    /// Create a patient with required fields.
    pub fn new(id: String, name: String, mrn: String, unit: String) -> Self {
        Self {
            id,
            name,
            age: None,
            room: None,
            mrn,
            unit,
            assigned_physician: None,
            receiving_physician: None,
        }
    }

    /// Short label for handover lists, e.g. "Room 12 - Ana Lima".
    pub fn display_label(&self) -> String {
        match &self.room {
            Some(room) => format!("Room {} - {}", room, self.name),
            None => self.name.clone(),
        }
    }
}
