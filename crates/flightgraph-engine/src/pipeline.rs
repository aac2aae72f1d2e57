//! Per-file pipeline: READ → BATCH → ENRICH → UPSERT

#![allow(clippy::result_large_err)]

use crate::report::FileReport;
use flightgraph_core::errors::{ExError, ExResult};
use flightgraph_core::graph::GraphStore;
use flightgraph_core::ingest::{total_batches, BatchBuilder, FlightSource};
use flightgraph_core::metadata::MetadataResolver;
use flightgraph_core::upsert::upsert_batch;
use flightgraph_core::{log_op_end, log_op_error, log_op_progress, log_op_start};
use std::time::Instant;

/// Import one source file, one transaction per batch
///
/// A batch whose records were all dropped is skipped but keeps its number.
///
/// # Errors
///
/// Configuration errors from the header, the first row parsing error, or
/// the first failed batch transaction. Batches committed before the
/// failure stay committed.
pub fn import_file<S: GraphStore>(
    store: &mut S,
    source: &FlightSource,
    resolver: &mut MetadataResolver,
    batch_size: usize,
) -> ExResult<FileReport> {
    let start = Instant::now();
    let file = source.path().display().to_string();
    log_op_start!("import_file", file = file.as_str());

    let result = run(store, source, resolver, batch_size);

    match &result {
        Ok(report) => {
            log_op_end!(
                "import_file",
                duration_ms = start.elapsed().as_millis() as u64,
                file = file.as_str(),
                rows = report.rows,
                imported = report.imported,
                dropped = report.dropped
            );
        }
        Err(err) => {
            log_op_error!(
                "import_file",
                err,
                duration_ms = start.elapsed().as_millis() as u64,
                file = file.as_str()
            );
        }
    }
    result
}

fn run<S: GraphStore>(
    store: &mut S,
    source: &FlightSource,
    resolver: &mut MetadataResolver,
    batch_size: usize,
) -> ExResult<FileReport> {
    let with_path = |err: ExError| match err.path() {
        Some(_) => err,
        None => err.with_path(source.path()),
    };

    let rows = source.count_rows().map_err(|e| with_path(e.into()))?;
    let total = total_batches(rows, batch_size);
    log_op_progress!(
        "import_file",
        format!("{}: {} rows in {} batches", source.name(), rows, total),
        rows = rows,
        total = total
    );

    let mut report = FileReport {
        path: source.path().to_path_buf(),
        rows,
        batches: total,
        ..FileReport::default()
    };

    let records = source.rows().map_err(|e| with_path(e.into()))?;
    for batch in BatchBuilder::new(records, batch_size, total) {
        let batch = batch.map_err(|e| with_path(e.into()))?;
        let enriched = resolver.enrich_batch(batch.records);
        report.dropped += enriched.dropped.len();
        if enriched.records.is_empty() {
            continue;
        }
        upsert_batch(store, batch.number, batch.total, &enriched.records)
            .map_err(with_path)?;
        report.imported += enriched.records.len();
    }
    Ok(report)
}
