//! Source discovery

use flightgraph_core::errors::{FlightGraphError, Result};
use flightgraph_core::ingest::FlightSource;
use std::path::{Path, PathBuf};

/// Resolve the files to import, in processing order
///
/// An explicit override wins; otherwise every `*.csv*` file directly in
/// `data_dir`, sorted by file name.
///
/// # Errors
///
/// `SourceNotFound`, `SourceDirMissing` or `NoSourceFiles`, plus
/// `UnsupportedCompression` for a matching file we cannot decode.
pub fn discover_sources(csv_override: Option<&Path>, data_dir: &Path) -> Result<Vec<FlightSource>> {
    if let Some(path) = csv_override {
        return Ok(vec![FlightSource::new(path)?]);
    }

    if !data_dir.is_dir() {
        return Err(FlightGraphError::SourceDirMissing {
            path: data_dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(data_dir).map_err(|e| FlightGraphError::Io {
        op: "discover_sources".to_string(),
        message: format!("{}: {}", data_dir.display(), e),
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| FlightGraphError::Io {
            op: "discover_sources".to_string(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if path.is_file() && is_csv_like(&path) {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(FlightGraphError::NoSourceFiles {
            path: data_dir.to_path_buf(),
        });
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    paths.into_iter().map(FlightSource::new).collect()
}

fn is_csv_like(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.to_ascii_lowercase().contains(".csv"))
}
