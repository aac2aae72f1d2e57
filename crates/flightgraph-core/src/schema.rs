//! Schema management
//!
//! One uniqueness constraint per node key. Installing the schema is
//! idempotent and runs on every import; a constraint the store cannot
//! build because existing data violates it aborts the run.

use crate::errors::ExResult;
use crate::graph::{ConstraintStatus, GraphStore};
use crate::model::Label;
use crate::{log_op_end, log_op_error, log_op_progress, log_op_start};
use std::time::Instant;

/// A uniqueness constraint over a label's key properties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueConstraint {
    pub name: &'static str,
    pub label: Label,
}

impl UniqueConstraint {
    pub fn properties(&self) -> &'static [&'static str] {
        self.label.key_properties()
    }
}

/// Every constraint the flight graph relies on
pub const CONSTRAINTS: [UniqueConstraint; 8] = [
    UniqueConstraint {
        name: "airport_code",
        label: Label::Airport,
    },
    UniqueConstraint {
        name: "flight_id",
        label: Label::Flight,
    },
    UniqueConstraint {
        name: "airline_code",
        label: Label::Airline,
    },
    UniqueConstraint {
        name: "aircraft_type",
        label: Label::AircraftType,
    },
    UniqueConstraint {
        name: "day_date",
        label: Label::Day,
    },
    UniqueConstraint {
        name: "country_name",
        label: Label::Country,
    },
    UniqueConstraint {
        name: "city_name_country",
        label: Label::City,
    },
    UniqueConstraint {
        name: "country_stats_country_year",
        label: Label::CountryStats,
    },
];

/// Result of a schema installation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub created: Vec<&'static str>,
    pub already_present: Vec<&'static str>,
}

/// Declare every uniqueness constraint on the store
///
/// # Errors
///
/// Returns the store's error (kind `Schema`) when a constraint is rejected.
pub fn ensure_schema<S: GraphStore + ?Sized>(store: &mut S) -> ExResult<SchemaReport> {
    let start = Instant::now();
    log_op_start!("ensure_schema", constraints = CONSTRAINTS.len());

    let mut report = SchemaReport::default();
    for constraint in &CONSTRAINTS {
        match store.ensure_unique_constraint(constraint) {
            Ok(ConstraintStatus::Created) => {
                log_op_progress!(
                    "ensure_schema",
                    format!("created constraint {}", constraint.name),
                    constraint = constraint.name
                );
                report.created.push(constraint.name);
            }
            Ok(ConstraintStatus::AlreadyPresent) => report.already_present.push(constraint.name),
            Err(err) => {
                log_op_error!(
                    "ensure_schema",
                    &err,
                    duration_ms = start.elapsed().as_millis() as u64,
                    constraint = constraint.name
                );
                return Err(err);
            }
        }
    }

    log_op_end!(
        "ensure_schema",
        duration_ms = start.elapsed().as_millis() as u64,
        created = report.created.len()
    );
    Ok(report)
}
