//! Store schema versioning
//!
//! The node and edge tables are created by embedded SQL scripts. Each
//! applied script is recorded with its checksum in `schema_version`, and a
//! recorded script whose text has since changed stops the store from
//! opening.

mod embedded;
mod runner;

pub use embedded::{Migration, MIGRATIONS};
pub use runner::apply_migrations;
