//! FlightGraph Store - SQLite property-graph backend
//!
//! Provides:
//! - Store URI parsing and connection setup
//! - Graph schema with migrations framework
//! - [`SqliteGraphStore`], a `GraphStore` over nodes/edges tables
//! - [`SqliteConnector`] for the retrying connection manager

pub mod connector;
pub mod db;
pub mod errors;
pub mod graph_store;
pub mod migrations;

// Re-export key types
pub use connector::SqliteConnector;
pub use db::StoreUri;
pub use errors::Result;
pub use graph_store::{SqliteGraphStore, SqliteTxn};
