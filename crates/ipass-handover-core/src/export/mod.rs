//! Export of handover documentation for the receiving team.

mod report;

pub use report::*;
