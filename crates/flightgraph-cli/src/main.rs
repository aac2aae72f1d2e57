//! FlightGraph CLI
//!
//! Command-line interface for importing flight data into the graph store

use clap::{Parser, Subcommand, ValueEnum};
use flightgraph_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable progress lines
    Human,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "flightgraph")]
#[command(about = "FlightGraph - flight data import into a property graph", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "human", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import flight files (and population statistics) into the graph
    Import(commands::import::ImportArgs),
    /// Connect and install the uniqueness constraints only
    Schema(commands::schema::SchemaArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init(match cli.log_format {
        LogFormat::Human => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Import(args) => commands::import::execute(args, cli.log_format),
        Commands::Schema(args) => commands::schema::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
