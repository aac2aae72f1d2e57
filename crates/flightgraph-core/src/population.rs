//! Population statistics: reference-table parsing and CountryStats upsert

use crate::errors::{ExResult, FlightGraphError, Result};
use crate::graph::{GraphStore, GraphTxn};
use crate::model::{NodeKey, PopulationRecord, Props, RelType};
use crate::upsert::transaction_error;
use crate::{log_op_error, log_op_progress};
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Instant;

/// Statistical years kept from the reference table
pub const ALLOWED_YEARS: RangeInclusive<i64> = 2015..=2023;

/// Header names of the population reference table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationColumns {
    pub country: String,
    pub year: String,
    pub population: String,
}

impl Default for PopulationColumns {
    fn default() -> Self {
        Self {
            country: "country".to_string(),
            year: "TIME_PERIOD".to_string(),
            population: "OBS_VALUE".to_string(),
        }
    }
}

/// Parsed population rows plus how many rows were filtered out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationTable {
    pub records: Vec<PopulationRecord>,
    pub skipped: usize,
}

impl PopulationTable {
    /// # Errors
    ///
    /// `ReferenceRead` when the file cannot be opened, `MissingColumn` when a
    /// configured column is absent.
    pub fn load(path: &Path, columns: &PopulationColumns) -> Result<Self> {
        let file = File::open(path).map_err(|e| FlightGraphError::ReferenceRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_reader(file, path, columns)
    }

    pub fn from_reader<R: Read>(reader: R, path: &Path, columns: &PopulationColumns) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| FlightGraphError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };
        let country_col = position(&columns.country)?;
        let year_col = position(&columns.year)?;
        let population_col = position(&columns.population)?;

        let mut table = Self::default();
        for row in csv_reader.records() {
            let row = row?;
            let field = |i: usize| row.get(i).unwrap_or("").trim();
            match parse_row(field(country_col), field(year_col), field(population_col)) {
                Some(record) => table.records.push(record),
                None => table.skipped += 1,
            }
        }
        Ok(table)
    }
}

fn parse_row(country: &str, period: &str, population: &str) -> Option<PopulationRecord> {
    if country.is_empty() {
        return None;
    }
    let year = parse_year(period)?;
    if !ALLOWED_YEARS.contains(&year) {
        return None;
    }
    Some(PopulationRecord {
        country: country.to_string(),
        year,
        population: parse_population(population)?,
    })
}

/// Leading four digits of a period such as `2019` or `2019-01`
fn parse_year(period: &str) -> Option<i64> {
    period.get(..4).and_then(|y| y.parse().ok())
}

fn parse_population(value: &str) -> Option<i64> {
    if let Ok(i) = value.parse::<i64>() {
        return (i >= 0).then_some(i);
    }
    let f: f64 = value.parse().ok()?;
    (f.is_finite() && f >= 0.0).then(|| f.trunc() as i64)
}

/// Upsert one batch of CountryStats nodes and their HAS_STATS edges
///
/// # Errors
///
/// `Transaction` carrying the batch number.
pub fn upsert_population_batch<S: GraphStore>(
    store: &mut S,
    batch: usize,
    total: usize,
    records: &[PopulationRecord],
) -> ExResult<()> {
    let start = Instant::now();
    let result = store
        .begin()
        .and_then(|mut tx| {
            for record in records {
                let country = NodeKey::country(&record.country);
                let stats = NodeKey::country_stats(&record.country, record.year);
                let mut props = Props::new();
                props.insert("population".to_string(), Value::from(record.population));

                tx.merge_node_create_only(&country, &Props::new())?;
                tx.merge_node_overwrite(&stats, &props)?;
                tx.merge_edge(&country, RelType::HasStats, &stats)?;
            }
            tx.commit()
        })
        .map_err(|cause| transaction_error(batch, cause));

    match result {
        Ok(()) => {
            log_op_progress!(
                "import_population",
                format!("batch {}/{}", batch, total),
                batch = batch,
                total = total,
                records = records.len()
            );
            Ok(())
        }
        Err(err) => {
            log_op_error!(
                "import_population",
                &err,
                duration_ms = start.elapsed().as_millis() as u64,
                batch = batch
            );
            Err(err)
        }
    }
}
