//! Vocabulary shared by every FlightGraph crate
//!
//! [`RunId`] tags one import run, [`Sensitive`] keeps secrets out of
//! Debug output and log lines, and [`schema`] names the structured log
//! fields and event kinds.

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RunId;
pub use sensitive::Sensitive;
