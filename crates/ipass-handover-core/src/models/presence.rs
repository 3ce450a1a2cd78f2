//! Collaboration presence models.

use serde::{Deserialize, Serialize};

/// Role a clinician holds while viewing a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PresenceRole {
    Assigned,
    Receiving,
    Observer,
}

impl PresenceRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceRole::Assigned => "assigned",
            PresenceRole::Receiving => "receiving",
            PresenceRole::Observer => "observer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "assigned" => Some(PresenceRole::Assigned),
            "receiving" => Some(PresenceRole::Receiving),
            "observer" => Some(PresenceRole::Observer),
            _ => None,
        }
    }
}

/// A clinician currently viewing or editing a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Presence {
    pub session_id: String,
    pub clinician_id: String,
    pub role: PresenceRole,
    pub last_seen: String,
}

impl Presence {
    pub fn now(session_id: String, clinician_id: String, role: PresenceRole) -> Self {
        Self {
            session_id,
            clinician_id,
            role,
            last_seen: chrono::Utc::now().to_rfc3339(),
        }
    }
}
