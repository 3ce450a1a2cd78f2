//! Domain models for the handover engine.

mod action;
mod contingency;
mod patient;
mod presence;
mod priority;
mod provenance;
mod session;
mod severity;

pub use action::*;
pub use contingency::*;
pub use patient::*;
pub use presence::*;
pub use priority::*;
pub use provenance::*;
pub use session::*;
pub use severity::*;
