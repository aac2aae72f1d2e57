//! Schema command
//!
//! Usage: flightgraph schema [--store-uri <URI>]

use crate::commands::store::StoreArgs;
use clap::Args;
use flightgraph_engine::{run_schema, ImportConfig};
use flightgraph_store::SqliteConnector;

#[derive(Debug, Args)]
pub struct SchemaArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

/// Execute schema command
pub fn execute(args: SchemaArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ImportConfig::default();
    config.store_uri = args.store.store_uri.clone();
    config.credentials = args.store.credentials();
    config.retry = args.store.retry_policy()?;

    let report = run_schema(&config, &SqliteConnector)?;

    for name in &report.created {
        println!("✓ Created constraint {}", name);
    }
    println!(
        "Schema ready ({} created, {} already present)",
        report.created.len(),
        report.already_present.len()
    );
    Ok(())
}
