#![allow(clippy::unwrap_used, clippy::expect_used)]

// Binary-level tests: argument handling, exit codes and printed summaries

use flightgraph_core::connection::{Connector, Credentials};
use flightgraph_core::graph::GraphStore;
use flightgraph_core::model::{Label, RelType};
use flightgraph_store::SqliteConnector;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const HEADER: &str = "ECTRL ID,ADEP,ADEP Latitude,ADEP Longitude,ADES,ADES Latitude,ADES Longitude,AC Operator,AC Type,ACTUAL OFF BLOCK TIME,ACTUAL ARRIVAL TIME,Actual Distance Flown (nm)";

const AIRPORTS: &str = "\
EPWA,Warsaw Chopin Airport,Warsaw,Poland,WAW
EGLL,London Heathrow,London,United Kingdom,LHR
";

fn flightgraph(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flightgraph"))
        .current_dir(dir)
        .env_clear()
        .env("PATH", std::env::var("PATH").unwrap_or_default())
        .args(args)
        .output()
        .expect("Failed to run flightgraph")
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    std::fs::write(dir.path().join("airports_mapping.csv"), AIRPORTS).unwrap();
    std::fs::write(
        dir.path().join("data").join("flights.csv"),
        format!(
            "{HEADER}\n\
             1,EPWA,52.1657,20.9671,EGLL,51.4775,-0.461389,LOT,B738,01-03-2018 10:00:00,01-03-2018 11:32:30,800\n\
             2,EPWA,52.1657,20.9671,ZZZZ,0,0,LOT,B738,01-03-2018 12:00:00,01-03-2018 13:00:00,300\n"
        ),
    )
    .unwrap();
    dir
}

fn store_uri(dir: &Path) -> String {
    format!("sqlite://{}", dir.join("graph.db").display())
}

#[test]
fn test_import_prints_summary_and_writes_graph() {
    let dir = workspace();
    let uri = store_uri(dir.path());

    let output = flightgraph(
        dir.path(),
        &["import", "--store-uri", &uri, "--connect-retries", "1", "--summary"],
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("2 rows, 1 batches, 1 imported, 1 dropped"));
    assert!(stdout.contains("Total: 2 rows, 1 imported, 1 dropped"));
    assert!(stdout.contains("Airport codes without metadata (1): ZZZZ"));
    assert!(stdout.contains("Population file population.csv not found"));
    assert!(stdout.contains("Relationships:"));

    let store = SqliteConnector
        .connect(&uri, &Credentials::new("flightgraph", "password"))
        .map_err(|_| "reconnect failed")
        .unwrap();
    let counts = store.counts().unwrap();
    assert_eq!(counts.nodes_of(Label::Flight), 1);
    assert_eq!(counts.edges_of(RelType::InCountry), 2);
}

#[test]
fn test_json_format_prints_report_object() {
    let dir = workspace();
    let uri = store_uri(dir.path());

    let output = flightgraph(
        dir.path(),
        &[
            "import",
            "--store-uri",
            &uri,
            "--connect-retries",
            "1",
            "--no-population",
            "--missing-metadata",
            "import-unenriched",
            "--log-format",
            "json",
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value = stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|value| value.get("run_id").is_some() && value.get("files").is_some())
        .expect("report object on stdout");
    assert_eq!(report["files"][0]["imported"], 2);
    assert_eq!(report["population"]["status"], "disabled");
}

#[test]
fn test_missing_data_dir_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let uri = store_uri(dir.path());

    let output = flightgraph(
        dir.path(),
        &["import", "--store-uri", &uri, "--data-dir", "nowhere"],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("ERR_CONFIGURATION"));
}

#[test]
fn test_schema_command_reports_constraints() {
    let dir = TempDir::new().unwrap();
    let uri = store_uri(dir.path());

    let first = flightgraph(dir.path(), &["schema", "--store-uri", &uri]);
    assert!(first.status.success());
    assert!(String::from_utf8_lossy(&first.stdout).contains("8 created, 0 already present"));

    let second = flightgraph(dir.path(), &["schema", "--store-uri", &uri]);
    assert!(String::from_utf8_lossy(&second.stdout).contains("0 created, 8 already present"));
}

#[test]
fn test_bad_store_uri_fails_without_retrying() {
    let dir = TempDir::new().unwrap();

    let output = flightgraph(
        dir.path(),
        &["schema", "--store-uri", "bolt://localhost:7687", "--connect-delay", "30"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERR_CONNECTIVITY"));
}
