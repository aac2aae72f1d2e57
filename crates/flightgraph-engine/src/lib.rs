//! FlightGraph Engine - Orchestration layer
//!
//! Drives an import run end to end: source discovery, connection, schema,
//! the per-file pipeline, population statistics and the run report. Stores
//! are reached only through the core's `Connector` and `GraphStore` traits.

pub mod config;
pub mod discovery;
pub mod orchestrator;
pub mod pipeline;
pub mod population;
pub mod report;

pub use config::ImportConfig;
pub use orchestrator::{run_import, run_schema};
pub use report::{FileReport, PopulationOutcome, RunReport};
