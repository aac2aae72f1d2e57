use flightgraph_core::errors::{ExError, ExErrorKind, FlightGraphError};
use std::path::{Path, PathBuf};

#[test]
fn test_configuration_errors_share_one_kind() {
    let errors = vec![
        FlightGraphError::SourceNotFound {
            path: PathBuf::from("data/flights.csv"),
        },
        FlightGraphError::SourceDirMissing {
            path: PathBuf::from("data"),
        },
        FlightGraphError::NoSourceFiles {
            path: PathBuf::from("data"),
        },
        FlightGraphError::MissingColumn {
            path: PathBuf::from("data/flights.csv"),
            column: "ADEP".to_string(),
        },
        FlightGraphError::UnsupportedCompression {
            path: PathBuf::from("data/flights.csv.bz2"),
        },
    ];

    for err in errors {
        let ex_err: ExError = err.into();
        assert_eq!(ex_err.kind(), ExErrorKind::Configuration);
        assert_eq!(ex_err.code(), "ERR_CONFIGURATION");
        assert!(ex_err.path().is_some());
    }
}

#[test]
fn test_row_parse_keeps_file_and_row() {
    let err = FlightGraphError::RowParse {
        path: PathBuf::from("data/flights.csv"),
        line: 12,
        field: "ACTUAL ARRIVAL TIME".to_string(),
        value: "yesterday".to_string(),
        reason: "input contains invalid characters".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::RowParsing);
    assert_eq!(ex_err.path(), Some(Path::new("data/flights.csv")));
    assert_eq!(ex_err.line(), Some(12));
    assert!(ex_err.message().contains("ACTUAL ARRIVAL TIME"));
}

#[test]
fn test_connection_exhausted_is_connectivity() {
    let err = FlightGraphError::ConnectionExhausted {
        uri: "sqlite://graph.db".to_string(),
        attempts: 15,
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::Connectivity);
    assert_eq!(ex_err.op(), Some("connect"));
    assert!(ex_err.to_string().contains("after 15 attempts"));
}

#[test]
fn test_constraint_rejection_is_schema_error() {
    let ex_err: ExError = FlightGraphError::ConstraintRejected {
        constraint: "airport_code".to_string(),
        reason: "UNIQUE constraint failed".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::Schema);
    assert_eq!(ex_err.code(), "ERR_SCHEMA");
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::Connectivity, "ERR_CONNECTIVITY"),
        (ExErrorKind::Configuration, "ERR_CONFIGURATION"),
        (ExErrorKind::RowParsing, "ERR_ROW_PARSING"),
        (ExErrorKind::Transaction, "ERR_TRANSACTION"),
        (ExErrorKind::Schema, "ERR_SCHEMA"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}
