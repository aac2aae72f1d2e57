//! Error handling for flightgraph-store
//!
//! Wraps flightgraph-core ExError with store-specific helpers

use flightgraph_core::errors::{ExError, ExErrorKind, FlightGraphError};
use rusqlite::ErrorCode;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Map a failed `CREATE UNIQUE INDEX` onto a schema error
pub fn constraint_error(constraint: &str, err: rusqlite::Error) -> ExError {
    if error_code(&err) == Some(ErrorCode::ConstraintViolation) {
        return FlightGraphError::ConstraintRejected {
            constraint: constraint.to_string(),
            reason: err.to_string(),
        }
        .into();
    }
    ExError::new(ExErrorKind::Schema)
        .with_op("ensure_schema")
        .with_message(format!("constraint {}: {}", constraint, err))
}

/// Whether the database may become reachable if we wait
pub fn is_transient(err: &rusqlite::Error) -> bool {
    matches!(
        error_code(err),
        Some(ErrorCode::CannotOpen | ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

fn error_code(err: &rusqlite::Error) -> Option<ErrorCode> {
    match err {
        rusqlite::Error::SqliteFailure(inner, _) => Some(inner.code),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None)
    }

    #[test]
    fn test_busy_and_cannot_open_are_transient() {
        assert!(is_transient(&failure(rusqlite::ffi::SQLITE_BUSY)));
        assert!(is_transient(&failure(rusqlite::ffi::SQLITE_CANTOPEN)));
        assert!(!is_transient(&failure(rusqlite::ffi::SQLITE_NOTADB)));
        assert!(!is_transient(&rusqlite::Error::InvalidQuery));
    }

    #[test]
    fn test_unique_violation_becomes_schema_error() {
        let err = constraint_error("airport_code", failure(rusqlite::ffi::SQLITE_CONSTRAINT));
        assert_eq!(err.kind(), ExErrorKind::Schema);
        assert!(err.message().contains("airport_code"));
    }
}
