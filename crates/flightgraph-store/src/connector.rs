//! Connect-and-verify for SQLite graph stores

#![allow(clippy::result_large_err)]

use crate::db::{configure, open_uri, verify, StoreUri};
use crate::errors::{from_rusqlite, is_transient};
use crate::graph_store::SqliteGraphStore;
use flightgraph_core::connection::{ConnectFailure, Connector, Credentials};

/// Opens [`SqliteGraphStore`]s from store URIs
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteConnector;

fn classify(err: rusqlite::Error) -> ConnectFailure {
    if is_transient(&err) {
        ConnectFailure::Unavailable(from_rusqlite(err).with_op("connect"))
    } else {
        ConnectFailure::Fatal(from_rusqlite(err).with_op("connect"))
    }
}

impl Connector for SqliteConnector {
    type Connection = SqliteGraphStore;

    /// SQLite has no authentication; credentials are not consulted
    fn connect(
        &self,
        uri: &str,
        _credentials: &Credentials,
    ) -> Result<SqliteGraphStore, ConnectFailure> {
        let target = StoreUri::parse(uri).map_err(ConnectFailure::Fatal)?;
        let conn = open_uri(&target).map_err(classify)?;
        configure(&conn).map_err(classify)?;
        verify(&conn).map_err(classify)?;
        SqliteGraphStore::new(conn).map_err(ConnectFailure::Fatal)
    }
}
