use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using FlightGraphError
pub type Result<T> = std::result::Result<T, FlightGraphError>;

/// Result type alias using the canonical ExError
pub type ExResult<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure that can end an import run maps onto one of these kinds.
/// Each kind has a stable code usable in tests and by wrapping tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Connection attempts exhausted or a non-transient connect failure
    Connectivity,
    /// Missing override file, missing directory, no sources, missing column
    Configuration,
    /// Malformed timestamp or non-numeric required field
    RowParsing,
    /// A batch transaction failed at the store
    Transaction,
    /// The store rejected a uniqueness constraint
    Schema,

    Io,
    Persistence,
    InvalidInput,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Connectivity => "ERR_CONNECTIVITY",
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::RowParsing => "ERR_ROW_PARSING",
            ExErrorKind::Transaction => "ERR_TRANSACTION",
            ExErrorKind::Schema => "ERR_SCHEMA",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification plus optional context (operation, file, row,
/// batch) so a failed run can be reported precisely and resumed by a re-run.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<PathBuf>,
    line: Option<u64>,
    batch: Option<usize>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            line: None,
            batch: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the file being processed
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add the 1-based data row number
    pub fn with_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    /// Add the 1-based batch number
    pub fn with_batch(mut self, batch: usize) -> Self {
        self.batch = Some(batch);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn line(&self) -> Option<u64> {
        self.line
    }

    pub fn batch(&self) -> Option<usize> {
        self.batch
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (file: {})", path.display())?;
        }
        if let Some(line) = self.line {
            write!(f, " (row: {})", line)?;
        }
        if let Some(batch) = self.batch {
            write!(f, " (batch: {})", batch)?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised by the ingestion core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlightGraphError {
    // ===== Connectivity =====
    /// Every connection attempt failed
    /// Every connection attempt failed; the last cause travels as the source
    #[error("Could not connect to graph store at {uri} after {attempts} attempts")]
    ConnectionExhausted { uri: String, attempts: u32 },

    // ===== Configuration =====
    /// Explicit single-file override does not exist
    #[error("Source file not found: {path:?}")]
    SourceNotFound { path: PathBuf },

    /// Configured source directory does not exist
    #[error("Source directory not found: {path:?}")]
    SourceDirMissing { path: PathBuf },

    /// Source directory contains no CSV-like files
    #[error("No CSV files in directory {path:?}")]
    NoSourceFiles { path: PathBuf },

    /// Compression suffix we cannot decode
    #[error("Unsupported compression for {path:?}")]
    UnsupportedCompression { path: PathBuf },

    /// Required CSV column absent from the header
    #[error("Missing required column '{column}' in {path:?}")]
    MissingColumn { path: PathBuf, column: String },

    /// Reference table exists but cannot be read
    #[error("Cannot read reference file {path:?}: {reason}")]
    ReferenceRead { path: PathBuf, reason: String },

    // ===== Row parsing =====
    /// A data row failed validation
    #[error("Row {line} of {path:?}: invalid {field} '{value}': {reason}")]
    RowParse {
        path: PathBuf,
        line: u64,
        field: String,
        value: String,
        reason: String,
    },

    // ===== Store =====
    /// Existing data violates a uniqueness constraint
    #[error("Constraint {constraint} rejected by store: {reason}")]
    ConstraintRejected { constraint: String, reason: String },

    /// A batch transaction failed
    #[error("Transaction for batch {batch} failed: {reason}")]
    TransactionFailed { batch: usize, reason: String },

    /// Edge endpoint was not merged before the edge
    #[error("Node {label}{key} not present in transaction")]
    MissingNode { label: String, key: String },

    /// I/O failure outside of a specific reference/source context
    #[error("I/O error during {op}: {message}")]
    Io { op: String, message: String },
}

impl From<FlightGraphError> for ExError {
    fn from(err: FlightGraphError) -> Self {
        match err {
            FlightGraphError::ConnectionExhausted { uri, attempts } => {
                ExError::new(ExErrorKind::Connectivity)
                    .with_op("connect")
                    .with_message(format!(
                        "Could not connect to {} after {} attempts",
                        uri, attempts
                    ))
            }

            FlightGraphError::SourceNotFound { path } => ExError::new(ExErrorKind::Configuration)
                .with_op("discover_sources")
                .with_message("Source file does not exist")
                .with_path(path),

            FlightGraphError::SourceDirMissing { path } => {
                ExError::new(ExErrorKind::Configuration)
                    .with_op("discover_sources")
                    .with_message("Source directory does not exist")
                    .with_path(path)
            }

            FlightGraphError::NoSourceFiles { path } => ExError::new(ExErrorKind::Configuration)
                .with_op("discover_sources")
                .with_message("No CSV files found in source directory")
                .with_path(path),

            FlightGraphError::UnsupportedCompression { path } => {
                ExError::new(ExErrorKind::Configuration)
                    .with_op("open_source")
                    .with_message("Unsupported compression (only .gz is decoded)")
                    .with_path(path)
            }

            FlightGraphError::MissingColumn { path, column } => {
                ExError::new(ExErrorKind::Configuration)
                    .with_op("read_header")
                    .with_message(format!("Missing required column '{}'", column))
                    .with_path(path)
            }

            FlightGraphError::ReferenceRead { path, reason } => {
                ExError::new(ExErrorKind::Configuration)
                    .with_op("load_reference")
                    .with_message(reason)
                    .with_path(path)
            }

            FlightGraphError::RowParse {
                path,
                line,
                field,
                value,
                reason,
            } => ExError::new(ExErrorKind::RowParsing)
                .with_op("parse_row")
                .with_message(format!("invalid {} '{}': {}", field, value, reason))
                .with_path(path)
                .with_line(line),

            FlightGraphError::ConstraintRejected { constraint, reason } => {
                ExError::new(ExErrorKind::Schema)
                    .with_op("ensure_schema")
                    .with_message(format!("constraint {}: {}", constraint, reason))
            }

            FlightGraphError::TransactionFailed { batch, reason } => {
                ExError::new(ExErrorKind::Transaction)
                    .with_op("upsert_batch")
                    .with_message(reason)
                    .with_batch(batch)
            }

            FlightGraphError::MissingNode { label, key } => ExError::new(ExErrorKind::Internal)
                .with_op("merge_edge")
                .with_message(format!("node {}{} was not merged before its edge", label, key)),

            FlightGraphError::Io { op, message } => ExError::new(ExErrorKind::Io)
                .with_op(op)
                .with_message(message),
        }
    }
}

/// Conversion from csv::Error for reads that have no better context
impl From<csv::Error> for FlightGraphError {
    fn from(err: csv::Error) -> Self {
        FlightGraphError::Io {
            op: "read_csv".to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes_are_stable() {
        let cases = [
            (ExErrorKind::Connectivity, "ERR_CONNECTIVITY"),
            (ExErrorKind::Configuration, "ERR_CONFIGURATION"),
            (ExErrorKind::RowParsing, "ERR_ROW_PARSING"),
            (ExErrorKind::Transaction, "ERR_TRANSACTION"),
            (ExErrorKind::Schema, "ERR_SCHEMA"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::RowParsing)
            .with_op("parse_row")
            .with_message("bad timestamp")
            .with_path("data/flights.csv")
            .with_line(7);
        let text = err.to_string();
        assert!(text.starts_with("[ERR_ROW_PARSING]"));
        assert!(text.contains("parse_row"));
        assert!(text.contains("data/flights.csv"));
        assert!(text.contains("(row: 7)"));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        let cause = ExError::new(ExErrorKind::Persistence).with_message("unable to open");
        let err = ExError::new(ExErrorKind::Connectivity).with_source(cause);
        assert_eq!(
            err.source_error().map(|e| e.kind()),
            Some(ExErrorKind::Persistence)
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
