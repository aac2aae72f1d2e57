//! Logging for import runs
//!
//! `init` picks the output (human lines or JSON) once per process. The
//! `log_op_*` macros give every stage the same `component`/`op`/`event`
//! fields, and `test_capture` lets tests read those events back.
//!
//! ```rust
//! use flightgraph_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
