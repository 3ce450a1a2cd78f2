//! Record provenance and the single guard that gates mutation.

use serde::{Deserialize, Serialize};

/// Origin of a clinical record. Assigned once at creation, never changed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Carried over from a prior shift or another clinician; read-only here
    SystemOfRecord,
    /// Created by the current clinician during this session
    UserAuthored,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::SystemOfRecord => "system_of_record",
            Provenance::UserAuthored => "user_authored",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system_of_record" => Some(Provenance::SystemOfRecord),
            "user_authored" => Some(Provenance::UserAuthored),
            _ => None,
        }
    }
}

/// Records that carry a provenance tag.
pub trait HasProvenance {
    fn provenance(&self) -> Provenance;
}

/// A record proven to be user-authored.
///
/// The only way to obtain one is [`Authored::check`], so any function taking
/// `Authored<T>` cannot be handed a carried-over record.
#[derive(Debug, Clone, PartialEq)]
pub struct Authored<T>(T);

impl<T: HasProvenance> Authored<T> {
    /// Split a record by provenance: `Ok` for user-authored, `Err` hands the
    /// system-of-record value back untouched.
    pub fn check(record: T) -> Result<Self, T> {
        match record.provenance() {
            Provenance::UserAuthored => Ok(Self(record)),
            Provenance::SystemOfRecord => Err(record),
        }
    }
}

impl<T> Authored<T> {
    pub fn get(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}
