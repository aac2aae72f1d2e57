//! Flight-event ingestion: source files, row validation, batching

pub mod batch;
pub mod row;
pub mod source;

pub use batch::{total_batches, Batch, BatchBuilder};
pub use row::RawFlightRow;
pub use source::{open_csv, Compression, FlightRows, FlightSource, REQUIRED_COLUMNS};
