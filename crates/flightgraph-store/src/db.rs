//! Database connection management
//!
//! Parses store URIs and opens configured SQLite connections

#![allow(clippy::result_large_err)]

use flightgraph_core::errors::{ExError, ExErrorKind};
use rusqlite::Connection;
use std::fmt;
use std::path::{Path, PathBuf};

pub const MEMORY_URI: &str = "sqlite::memory:";

/// Where the graph lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUri {
    Memory,
    File(PathBuf),
}

impl StoreUri {
    /// Accepts `sqlite://<path>`, `sqlite::memory:` or a bare file path
    ///
    /// # Errors
    ///
    /// `InvalidInput` for other schemes or an empty path.
    pub fn parse(uri: &str) -> Result<Self, ExError> {
        let uri = uri.trim();
        if uri == MEMORY_URI || uri == ":memory:" {
            return Ok(StoreUri::Memory);
        }
        let path = match uri.split_once("://") {
            Some(("sqlite", path)) => path,
            Some((scheme, _)) => {
                return Err(ExError::new(ExErrorKind::InvalidInput)
                    .with_op("parse_store_uri")
                    .with_message(format!("unsupported store scheme '{}'", scheme)))
            }
            None => uri,
        };
        if path.is_empty() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_store_uri")
                .with_message("store URI has no path"));
        }
        Ok(StoreUri::File(PathBuf::from(path)))
    }
}

impl fmt::Display for StoreUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreUri::Memory => f.write_str(MEMORY_URI),
            StoreUri::File(path) => write!(f, "sqlite://{}", path.display()),
        }
    }
}

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> rusqlite::Result<Connection> {
    Connection::open(path)
}

/// Open the database a URI points at
pub fn open_uri(uri: &StoreUri) -> rusqlite::Result<Connection> {
    match uri {
        StoreUri::Memory => Connection::open_in_memory(),
        StoreUri::File(path) => open(path),
    }
}

/// Configure a connection with optimal settings
pub fn configure(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    // In-memory databases silently keep their own journal mode
    conn.pragma_update(None, "journal_mode", "WAL")?;
    Ok(())
}

/// Round-trip a trivial query to prove the connection is usable
pub fn verify(conn: &Connection) -> rusqlite::Result<()> {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}
