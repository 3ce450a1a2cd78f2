//! Illness severity models with a hash-chained audit trail.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Illness severity, ordered from least to most acute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Stable,
    /// Also documented as "guarded"
    Watcher,
    Unstable,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Stable => "stable",
            Severity::Watcher => "watcher",
            Severity::Unstable => "unstable",
            Severity::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "stable" => Some(Severity::Stable),
            "watcher" | "guarded" => Some(Severity::Watcher),
            "unstable" => Some(Severity::Unstable),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

/// Genesis value for the first entry's `prev_hash`.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// One entry in a patient's severity audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentRecord {
    pub id: String,
    pub patient_id: String,
    pub value: Severity,
    /// Clinician who set the value
    pub set_by: String,
    pub recorded_at: String,
    /// Position in the patient's trail, starting at 1
    pub seq: u32,
    /// Hash of the previous entry (or [`GENESIS_HASH`])
    pub prev_hash: String,
    /// SHA-256 over `prev_hash` and the entry body
    pub hash: String,
}

/// Hashed body of an entry; field order is fixed for deterministic output.
#[derive(Serialize)]
struct HashedBody<'a> {
    id: &'a str,
    patient_id: &'a str,
    value: Severity,
    set_by: &'a str,
    recorded_at: &'a str,
    seq: u32,
}

impl AssessmentRecord {
    /// Build the next entry after `prev` (or the first entry if `None`).
    pub fn next(
        patient_id: String,
        value: Severity,
        set_by: String,
        prev: Option<&AssessmentRecord>,
    ) -> Result<Self, serde_json::Error> {
        let (seq, prev_hash) = match prev {
            Some(p) => (p.seq + 1, p.hash.clone()),
            None => (1, GENESIS_HASH.to_string()),
        };
        let mut record = Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            value,
            set_by,
            recorded_at: chrono::Utc::now().to_rfc3339(),
            seq,
            prev_hash,
            hash: String::new(),
        };
        record.hash = record.compute_hash()?;
        Ok(record)
    }

    /// Recompute this entry's hash from its contents.
    pub fn compute_hash(&self) -> Result<String, serde_json::Error> {
        let body = serde_json::to_string(&HashedBody {
            id: &self.id,
            patient_id: &self.patient_id,
            value: self.value,
            set_by: &self.set_by,
            recorded_at: &self.recorded_at,
            seq: self.seq,
        })?;
        let mut hasher = Sha256::new();
        hasher.update(self.prev_hash.as_bytes());
        hasher.update(body.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Check that a trail (oldest first) is contiguous and untampered.
pub fn verify_chain(history: &[AssessmentRecord]) -> bool {
    let mut expected_prev = GENESIS_HASH.to_string();
    for (i, entry) in history.iter().enumerate() {
        if entry.seq as usize != i + 1 || entry.prev_hash != expected_prev {
            return false;
        }
        match entry.compute_hash() {
            Ok(h) if h == entry.hash => expected_prev = h,
            _ => return false,
        }
    }
    true
}
