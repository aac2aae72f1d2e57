//! Import command
//!
//! Usage: flightgraph import [--csv <FILE> | --data-dir <DIR>] [--summary]

use crate::commands::store::StoreArgs;
use crate::LogFormat;
use clap::{Args, ValueEnum};
use flightgraph_core::metadata::MissingMetadataPolicy;
use flightgraph_core::model::{Label, RelType};
use flightgraph_engine::{config, run_import, ImportConfig, PopulationOutcome, RunReport};
use flightgraph_store::SqliteConnector;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MissingMetadata {
    /// Leave flights with an unknown airport out of the graph
    Drop,
    /// Import them without city/country for that airport
    ImportUnenriched,
}

impl From<MissingMetadata> for MissingMetadataPolicy {
    fn from(value: MissingMetadata) -> Self {
        match value {
            MissingMetadata::Drop => MissingMetadataPolicy::Drop,
            MissingMetadata::ImportUnenriched => MissingMetadataPolicy::ImportUnenriched,
        }
    }
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Records per transaction
    #[arg(long, env = "BATCH_SIZE", default_value_t = config::DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Import this single file instead of scanning the data directory
    #[arg(long, env = "CSV_PATH")]
    pub csv: Option<PathBuf>,

    /// Directory scanned for *.csv* files
    #[arg(long, env = "DATA_DIR", default_value = config::DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Airport metadata table (icao,name,city,country,iata; no header)
    #[arg(long, env = "AIRPORTS_METADATA", default_value = config::DEFAULT_AIRPORTS_METADATA)]
    pub airports: PathBuf,

    /// Population table (country,TIME_PERIOD,OBS_VALUE)
    #[arg(long, env = "POPULATION_DATA", default_value = config::DEFAULT_POPULATION_DATA)]
    pub population: PathBuf,

    /// Skip airport metadata enrichment
    #[arg(long, env = "SKIP_ENRICHMENT")]
    pub no_enrichment: bool,

    /// Skip the population import
    #[arg(long, env = "SKIP_POPULATION")]
    pub no_population: bool,

    /// What to do with flights whose airport has no metadata
    #[arg(long, env = "MISSING_METADATA_POLICY", value_enum, default_value = "drop")]
    pub missing_metadata: MissingMetadata,

    /// Print node and relationship counts after the import
    #[arg(long)]
    pub summary: bool,
}

impl ImportArgs {
    fn into_config(self) -> Result<ImportConfig, String> {
        let mut config = ImportConfig::default();
        config.store_uri = self.store.store_uri.clone();
        config.credentials = self.store.credentials();
        config.retry = self.store.retry_policy()?;
        config.csv_override = self.csv;
        config.data_dir = self.data_dir;
        config.airports_path = self.airports;
        config.population_path = self.population;
        config.enrichment = !self.no_enrichment;
        config.population = !self.no_population;
        config.missing_metadata = self.missing_metadata.into();
        Ok(config.with_batch_size(self.batch_size))
    }
}

/// Execute import command
pub fn execute(args: ImportArgs, format: LogFormat) -> Result<(), Box<dyn std::error::Error>> {
    let summary = args.summary;
    let config = args.into_config()?;

    let report = run_import(&config, &SqliteConnector)?;

    match format {
        LogFormat::Json => println!("{}", serde_json::to_string(&report)?),
        LogFormat::Human => print_report(&report),
    }
    if summary {
        print_counts(&report);
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    for file in &report.files {
        println!(
            "✓ {}: {} rows, {} batches, {} imported, {} dropped",
            file.path.display(),
            file.rows,
            file.batches,
            file.imported,
            file.dropped
        );
    }
    println!(
        "Total: {} rows, {} imported, {} dropped",
        report.total_rows(),
        report.total_imported(),
        report.total_dropped()
    );
    match &report.population {
        PopulationOutcome::Disabled => println!("Population import disabled"),
        PopulationOutcome::MissingFile { path } => {
            println!("Population file {} not found, skipped", path.display())
        }
        PopulationOutcome::Imported { rows, skipped, .. } => {
            println!("✓ Population: {} rows imported, {} skipped", rows, skipped)
        }
    }
    if report.missing_codes.is_empty() {
        println!("All airport codes matched metadata");
    } else {
        println!(
            "Airport codes without metadata ({}): {}",
            report.missing_codes.len(),
            report.missing_codes.join(", ")
        );
    }
    println!(
        "Import finished in {:.1}s (run {})",
        report.elapsed.as_secs_f64(),
        report.run_id
    );
}

fn print_counts(report: &RunReport) {
    println!("Nodes:");
    for label in Label::ALL {
        println!("  {:<14} {}", label.as_str(), report.counts.nodes_of(label));
    }
    println!("Relationships:");
    for rel in RelType::ALL {
        println!("  {:<14} {}", rel.as_str(), report.counts.edges_of(rel));
    }
}
