//! Import orchestration
//!
//! ## Run flow (in order, fail-fast):
//! 1. Discover sources (override file or sorted directory scan)
//! 2. Load airport metadata (skipped when disabled or absent)
//! 3. Connect with bounded retry
//! 4. Install schema
//! 5. Per file: read, batch, enrich, upsert
//! 6. Population import
//! 7. Report missing metadata codes
//! 8. Close the connection

#![allow(clippy::result_large_err)]

use crate::config::ImportConfig;
use crate::discovery::discover_sources;
use crate::pipeline::import_file;
use crate::population::import_population;
use crate::report::{PopulationOutcome, RunReport};
use flightgraph_core::connection::{connect_with_retry, Connector};
use flightgraph_core::errors::{ExError, ExResult};
use flightgraph_core::graph::GraphStore;
use flightgraph_core::metadata::{AirportDirectory, MetadataResolver};
use flightgraph_core::schema::{ensure_schema, SchemaReport};
use flightgraph_core::{log_op_end, log_op_error, log_op_progress, log_op_start};
use flightgraph_core_types::RunId;
use std::collections::BTreeSet;
use std::time::Instant;

/// Run a complete import
///
/// # Errors
///
/// The first fatal error of any stage. Batches committed before it stay
/// committed, so the run can simply be repeated.
pub fn run_import<C>(config: &ImportConfig, connector: &C) -> ExResult<RunReport>
where
    C: Connector,
    C::Connection: GraphStore,
{
    let run_id = RunId::new();
    let span = tracing::info_span!("import_run", run_id = %run_id);
    let _entered = span.enter();

    let start = Instant::now();
    log_op_start!("import_run", store = config.store_uri.as_str());

    match execute(config, connector, &run_id, start) {
        Ok(report) => {
            log_op_end!(
                "import_run",
                duration_ms = start.elapsed().as_millis() as u64,
                files = report.files.len(),
                rows = report.total_rows(),
                imported = report.total_imported(),
                dropped = report.total_dropped()
            );
            Ok(report)
        }
        Err(err) => {
            log_op_error!(
                "import_run",
                &err,
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

fn execute<C>(
    config: &ImportConfig,
    connector: &C,
    run_id: &RunId,
    start: Instant,
) -> ExResult<RunReport>
where
    C: Connector,
    C::Connection: GraphStore,
{
    let sources = discover_sources(config.csv_override.as_deref(), &config.data_dir)
        .map_err(ExError::from)?;
    let mut resolver = build_resolver(config)?;

    let mut store = connect_with_retry(
        connector,
        &config.store_uri,
        &config.credentials,
        config.retry,
    )?;
    let schema = ensure_schema(&mut store)?;

    let mut files = Vec::with_capacity(sources.len());
    for source in &sources {
        files.push(import_file(
            &mut store,
            source,
            &mut resolver,
            config.batch_size(),
        )?);
    }

    let population = if config.population {
        import_population(
            &mut store,
            &config.population_path,
            &config.population_columns,
            config.batch_size(),
        )?
    } else {
        PopulationOutcome::Disabled
    };

    report_missing(resolver.missing_codes());

    let counts = store.counts()?;
    store.close()?;

    Ok(RunReport {
        run_id: run_id.to_string(),
        files,
        constraints_created: schema.created,
        population,
        missing_codes: resolver.missing_codes().iter().cloned().collect(),
        counts,
        elapsed: start.elapsed(),
    })
}

/// Connect and install the schema, nothing else
///
/// # Errors
///
/// `Connectivity` or `Schema`.
pub fn run_schema<C>(config: &ImportConfig, connector: &C) -> ExResult<SchemaReport>
where
    C: Connector,
    C::Connection: GraphStore,
{
    let mut store = connect_with_retry(
        connector,
        &config.store_uri,
        &config.credentials,
        config.retry,
    )?;
    let report = ensure_schema(&mut store)?;
    store.close()?;
    Ok(report)
}

/// Resolver for this run; disabled when enrichment is off or has no table
fn build_resolver(config: &ImportConfig) -> ExResult<MetadataResolver> {
    if !config.enrichment {
        log_op_progress!("load_metadata", "airport enrichment disabled");
        return Ok(MetadataResolver::disabled());
    }
    if !config.airports_path.is_file() {
        log_op_progress!(
            "load_metadata",
            format!(
                "airport metadata {} not found, importing without enrichment",
                config.airports_path.display()
            )
        );
        return Ok(MetadataResolver::disabled());
    }

    let directory = AirportDirectory::load(&config.airports_path).map_err(ExError::from)?;
    log_op_progress!(
        "load_metadata",
        format!("loaded {} airport codes", directory.len()),
        codes = directory.len()
    );
    Ok(MetadataResolver::new(directory, config.missing_metadata))
}

fn report_missing(codes: &BTreeSet<String>) {
    if codes.is_empty() {
        log_op_progress!("report_missing", "every airport code had metadata");
        return;
    }
    let list = codes.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
    log_op_progress!(
        "report_missing",
        format!("{} airport codes without metadata: {}", codes.len(), list),
        count = codes.len(),
        codes = list.as_str()
    );
}
