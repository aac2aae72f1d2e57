//! Import configuration

use flightgraph_core::connection::{Credentials, RetryPolicy};
use flightgraph_core::metadata::MissingMetadataPolicy;
use flightgraph_core::population::PopulationColumns;
use std::path::PathBuf;

pub const DEFAULT_STORE_URI: &str = "sqlite://flightgraph.db";
pub const DEFAULT_BATCH_SIZE: usize = 4000;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_AIRPORTS_METADATA: &str = "airports_mapping.csv";
pub const DEFAULT_POPULATION_DATA: &str = "population.csv";

/// Everything one import run needs to know
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub store_uri: String,
    pub credentials: Credentials,
    pub retry: RetryPolicy,
    batch_size: usize,
    /// Single file to import instead of scanning `data_dir`
    pub csv_override: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub airports_path: PathBuf,
    pub population_path: PathBuf,
    pub population_columns: PopulationColumns,
    pub enrichment: bool,
    pub population: bool,
    pub missing_metadata: MissingMetadataPolicy,
}

impl ImportConfig {
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Clamped to at least one record per batch
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            store_uri: DEFAULT_STORE_URI.to_string(),
            credentials: Credentials::new("flightgraph", "password"),
            retry: RetryPolicy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            csv_override: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            airports_path: PathBuf::from(DEFAULT_AIRPORTS_METADATA),
            population_path: PathBuf::from(DEFAULT_POPULATION_DATA),
            population_columns: PopulationColumns::default(),
            enrichment: true,
            population: true,
            missing_metadata: MissingMetadataPolicy::Drop,
        }
    }
}
