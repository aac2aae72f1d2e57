//! Run outcome reporting

use flightgraph_core::graph::GraphCounts;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of importing one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Data rows read from the file
    pub rows: u64,
    /// Batches the rows were split into
    pub batches: usize,
    /// Flights written to the graph
    pub imported: usize,
    /// Flights excluded for lack of airport metadata
    pub dropped: usize,
}

/// Outcome of the population stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PopulationOutcome {
    /// Stage switched off in the configuration
    Disabled,
    /// Reference file absent; nothing imported
    MissingFile { path: PathBuf },
    Imported {
        rows: usize,
        skipped: usize,
        batches: usize,
    },
}

/// Summary of a complete import run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub files: Vec<FileReport>,
    pub constraints_created: Vec<&'static str>,
    pub population: PopulationOutcome,
    /// Airport codes without metadata, sorted and deduplicated
    pub missing_codes: Vec<String>,
    #[serde(skip)]
    pub counts: GraphCounts,
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl RunReport {
    pub fn total_rows(&self) -> u64 {
        self.files.iter().map(|f| f.rows).sum()
    }

    pub fn total_imported(&self) -> usize {
        self.files.iter().map(|f| f.imported).sum()
    }

    pub fn total_dropped(&self) -> usize {
        self.files.iter().map(|f| f.dropped).sum()
    }
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn file(path: &str, rows: u64, imported: usize, dropped: usize) -> FileReport {
        FileReport {
            path: PathBuf::from(path),
            rows,
            batches: 1,
            imported,
            dropped,
        }
    }

    fn report(population: PopulationOutcome) -> RunReport {
        RunReport {
            run_id: "run-1".to_string(),
            files: vec![file("a.csv", 10, 8, 2), file("b.csv", 5, 5, 0)],
            constraints_created: vec!["airport_code"],
            population,
            missing_codes: vec!["ZZZZ".to_string()],
            counts: GraphCounts::default(),
            elapsed: Duration::from_millis(1530),
        }
    }

    #[test]
    fn test_totals_sum_over_files() {
        let report = report(PopulationOutcome::Disabled);
        assert_eq!(report.total_rows(), 15);
        assert_eq!(report.total_imported(), 13);
        assert_eq!(report.total_dropped(), 2);
    }

    #[test]
    fn test_json_shape() {
        let value = serde_json::to_value(report(PopulationOutcome::Disabled)).unwrap();

        assert_eq!(value["population"], json!({ "status": "disabled" }));
        assert_eq!(value["elapsed"], Value::from(1530));
        assert_eq!(value["files"][0]["path"], Value::from("a.csv"));
        assert_eq!(value["constraints_created"], json!(["airport_code"]));
        assert!(value.get("counts").is_none());
    }

    #[test]
    fn test_population_outcome_is_tagged_by_status() {
        let imported = serde_json::to_value(report(PopulationOutcome::Imported {
            rows: 4,
            skipped: 1,
            batches: 2,
        }))
        .unwrap();
        assert_eq!(
            imported["population"],
            json!({ "status": "imported", "rows": 4, "skipped": 1, "batches": 2 })
        );

        let missing = serde_json::to_value(report(PopulationOutcome::MissingFile {
            path: PathBuf::from("population.csv"),
        }))
        .unwrap();
        assert_eq!(missing["population"]["status"], Value::from("missing_file"));
        assert_eq!(missing["population"]["path"], Value::from("population.csv"));
    }
}
