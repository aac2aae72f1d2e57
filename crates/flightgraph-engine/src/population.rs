//! Population import stage

#![allow(clippy::result_large_err)]

use crate::report::PopulationOutcome;
use flightgraph_core::errors::{ExError, ExResult};
use flightgraph_core::graph::GraphStore;
use flightgraph_core::ingest::total_batches;
use flightgraph_core::population::{upsert_population_batch, PopulationColumns, PopulationTable};
use flightgraph_core::{log_op_end, log_op_error, log_op_progress, log_op_start};
use std::path::Path;
use std::time::Instant;

/// Load the population table and upsert it in batches
///
/// An absent reference file is not an error: the stage logs and returns
/// [`PopulationOutcome::MissingFile`].
///
/// # Errors
///
/// Configuration errors for an unreadable table, `Transaction` for a failed
/// batch.
pub fn import_population<S: GraphStore>(
    store: &mut S,
    path: &Path,
    columns: &PopulationColumns,
    batch_size: usize,
) -> ExResult<PopulationOutcome> {
    if !path.is_file() {
        log_op_progress!(
            "import_population",
            format!("population file {} not found, skipping", path.display()),
            file = path.display().to_string().as_str()
        );
        return Ok(PopulationOutcome::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let start = Instant::now();
    log_op_start!("import_population", file = path.display().to_string().as_str());

    let result = load_and_upsert(store, path, columns, batch_size.max(1));
    match &result {
        Ok(outcome) => {
            log_op_end!(
                "import_population",
                duration_ms = start.elapsed().as_millis() as u64,
                outcome = ?outcome
            );
        }
        Err(err) => {
            log_op_error!(
                "import_population",
                err,
                duration_ms = start.elapsed().as_millis() as u64
            );
        }
    }
    result
}

fn load_and_upsert<S: GraphStore>(
    store: &mut S,
    path: &Path,
    columns: &PopulationColumns,
    batch_size: usize,
) -> ExResult<PopulationOutcome> {
    let table = PopulationTable::load(path, columns).map_err(ExError::from)?;
    let total = total_batches(table.records.len() as u64, batch_size);
    for (i, chunk) in table.records.chunks(batch_size).enumerate() {
        upsert_population_batch(store, i + 1, total, chunk)?;
    }
    Ok(PopulationOutcome::Imported {
        rows: table.records.len(),
        skipped: table.skipped,
        batches: total,
    })
}
