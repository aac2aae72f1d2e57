//! FlightGraph Core - storage-agnostic flight ingestion kernel
//!
//! This crate provides everything the import pipeline needs short of a
//! concrete store:
//! - the property-graph model (labels, node keys, relationship types)
//! - graph-store primitives ([`GraphStore`], [`GraphTxn`]) and an in-memory store
//! - schema installation, connection retry and airport metadata resolution
//! - flight-row parsing, batching and the batch upsert engine
//! - population statistics import
//! - the error and logging facilities shared by every crate

pub mod connection;
pub mod errors;
pub mod graph;
pub mod ingest;
pub mod logging_facility;
pub mod metadata;
pub mod model;
pub mod population;
pub mod schema;
pub mod upsert;

// Re-export commonly used types
pub use connection::{connect_with_retry, ConnectFailure, Connector, Credentials, RetryPolicy};
pub use errors::{ExError, ExErrorKind, ExResult, FlightGraphError, Result};
pub use graph::{ConstraintStatus, GraphCounts, GraphStore, GraphTxn, MemoryGraph};
pub use ingest::{total_batches, Batch, BatchBuilder, FlightSource};
pub use metadata::{AirportDirectory, MetadataResolver, MissingMetadataPolicy};
pub use model::{FlightRecord, Label, NodeKey, PopulationRecord, RelType};
pub use population::{upsert_population_batch, PopulationColumns, PopulationTable};
pub use schema::{ensure_schema, SchemaReport, UniqueConstraint, CONSTRAINTS};
pub use upsert::upsert_batch;
