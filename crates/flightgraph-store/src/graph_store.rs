//! SQLite-backed property graph
//!
//! Nodes and edges live in two tables (see `migrations/`). Node merges look
//! the node up by `(label, node_key)` and insert or patch its JSON
//! properties; edge merges rely on the `UNIQUE (rel_type, src_id, dst_id)`
//! table constraint.

#![allow(clippy::result_large_err)]

use crate::errors::{constraint_error, from_rusqlite, Result};
use crate::migrations::apply_migrations;
use flightgraph_core::errors::{ExError, ExErrorKind, FlightGraphError};
use flightgraph_core::graph::{ConstraintStatus, GraphCounts, GraphStore, GraphTxn};
use flightgraph_core::model::{Label, NodeKey, Props, RelType};
use flightgraph_core::schema::UniqueConstraint;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::collections::HashMap;

/// Graph store over one SQLite connection
#[derive(Debug)]
pub struct SqliteGraphStore {
    conn: Connection,
}

impl SqliteGraphStore {
    /// Wrap an open connection, applying pending migrations
    pub fn new(mut conn: Connection) -> Result<Self> {
        apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Fresh in-memory graph
    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory().map_err(from_rusqlite)?)
    }

    /// Underlying connection, for ad-hoc queries
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Properties of one node, key properties included
    pub fn node_props(&self, key: &NodeKey) -> Result<Option<Props>> {
        let props: Option<String> = self
            .conn
            .query_row(
                "SELECT props FROM nodes WHERE label = ?1 AND node_key = ?2",
                params![key.label().as_str(), key.canonical()],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;
        props.map(|text| parse_props(&text)).transpose()
    }

    /// Whether the `from -[rel]-> to` edge exists
    pub fn has_edge(&self, from: &NodeKey, rel: RelType, to: &NodeKey) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM edges e
                 JOIN nodes s ON s.id = e.src_id
                 JOIN nodes d ON d.id = e.dst_id
                 WHERE e.rel_type = ?1
                   AND s.label = ?2 AND s.node_key = ?3
                   AND d.label = ?4 AND d.node_key = ?5",
                params![
                    rel.as_str(),
                    from.label().as_str(),
                    from.canonical(),
                    to.label().as_str(),
                    to.canonical()
                ],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;
        Ok(found.is_some())
    }
}

fn index_name(constraint: &UniqueConstraint) -> String {
    format!("uq_{}", constraint.name)
}

fn parse_props(text: &str) -> Result<Props> {
    serde_json::from_str(text).map_err(|e| {
        ExError::new(ExErrorKind::Persistence)
            .with_op("read_props")
            .with_message(format!("invalid node properties: {}", e))
    })
}

fn props_json(props: &Props) -> Result<String> {
    serde_json::to_string(props).map_err(|e| {
        ExError::new(ExErrorKind::Internal)
            .with_op("write_props")
            .with_message(e.to_string())
    })
}

impl GraphStore for SqliteGraphStore {
    type Txn<'a> = SqliteTxn<'a>;

    fn begin(&mut self) -> Result<SqliteTxn<'_>> {
        let tx = self.conn.transaction().map_err(from_rusqlite)?;
        Ok(SqliteTxn {
            tx,
            ids: HashMap::new(),
        })
    }

    fn ensure_unique_constraint(
        &mut self,
        constraint: &UniqueConstraint,
    ) -> Result<ConstraintStatus> {
        let name = index_name(constraint);
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = ?1",
                [&name],
                |row| row.get(0),
            )
            .optional()
            .map_err(from_rusqlite)?;
        if exists.is_some() {
            return Ok(ConstraintStatus::AlreadyPresent);
        }

        // Labels come from a closed enum, so inlining them is safe
        let sql = format!(
            "CREATE UNIQUE INDEX {} ON nodes(node_key) WHERE label = '{}'",
            name,
            constraint.label.as_str()
        );
        self.conn
            .execute_batch(&sql)
            .map_err(|e| constraint_error(constraint.name, e))?;
        Ok(ConstraintStatus::Created)
    }

    fn counts(&self) -> Result<GraphCounts> {
        let mut counts = GraphCounts::default();

        let mut stmt = self
            .conn
            .prepare("SELECT label, COUNT(*) FROM nodes GROUP BY label")
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
            .map_err(from_rusqlite)?;
        for row in rows {
            let (label, n) = row.map_err(from_rusqlite)?;
            if let Some(label) = Label::parse(&label) {
                counts.nodes.insert(label, n as usize);
            }
        }

        let mut stmt = self
            .conn
            .prepare("SELECT rel_type, COUNT(*) FROM edges GROUP BY rel_type")
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
            .map_err(from_rusqlite)?;
        for row in rows {
            let (rel, n) = row.map_err(from_rusqlite)?;
            if let Some(rel) = RelType::parse(&rel) {
                counts.edges.insert(rel, n as usize);
            }
        }

        Ok(counts)
    }

    fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| from_rusqlite(e))
    }
}

/// One SQLite transaction; rolled back on drop unless committed
pub struct SqliteTxn<'a> {
    tx: Transaction<'a>,
    ids: HashMap<NodeKey, i64>,
}

impl SqliteTxn<'_> {
    fn lookup(&mut self, key: &NodeKey) -> Result<Option<i64>> {
        if let Some(id) = self.ids.get(key) {
            return Ok(Some(*id));
        }
        let id: Option<i64> = self
            .tx
            .prepare_cached("SELECT id FROM nodes WHERE label = ?1 AND node_key = ?2")
            .and_then(|mut stmt| {
                stmt.query_row(params![key.label().as_str(), key.canonical()], |row| {
                    row.get(0)
                })
                .optional()
            })
            .map_err(from_rusqlite)?;
        if let Some(id) = id {
            self.ids.insert(key.clone(), id);
        }
        Ok(id)
    }

    fn insert(&mut self, key: &NodeKey, props: &Props) -> Result<i64> {
        let mut all = props.clone();
        all.extend(key.key_props());
        let json = props_json(&all)?;
        self.tx
            .prepare_cached("INSERT INTO nodes (label, node_key, props) VALUES (?1, ?2, ?3)")
            .and_then(|mut stmt| stmt.execute(params![key.label().as_str(), key.canonical(), json]))
            .map_err(from_rusqlite)?;
        let id = self.tx.last_insert_rowid();
        self.ids.insert(key.clone(), id);
        Ok(id)
    }

    fn require(&mut self, key: &NodeKey) -> Result<i64> {
        self.lookup(key)?.ok_or_else(|| {
            FlightGraphError::MissingNode {
                label: key.label().to_string(),
                key: key.canonical(),
            }
            .into()
        })
    }
}

impl GraphTxn for SqliteTxn<'_> {
    fn merge_node_create_only(&mut self, key: &NodeKey, props: &Props) -> Result<()> {
        if self.lookup(key)?.is_none() {
            self.insert(key, props)?;
        }
        Ok(())
    }

    fn merge_node_overwrite(&mut self, key: &NodeKey, props: &Props) -> Result<()> {
        match self.lookup(key)? {
            None => {
                self.insert(key, props)?;
            }
            Some(id) => {
                let patch = props_json(props)?;
                self.tx
                    .prepare_cached("UPDATE nodes SET props = json_patch(props, ?1) WHERE id = ?2")
                    .and_then(|mut stmt| stmt.execute(params![patch, id]))
                    .map_err(from_rusqlite)?;
            }
        }
        Ok(())
    }

    fn merge_edge(&mut self, from: &NodeKey, rel: RelType, to: &NodeKey) -> Result<()> {
        let src = self.require(from)?;
        let dst = self.require(to)?;
        self.tx
            .prepare_cached(
                "INSERT OR IGNORE INTO edges (rel_type, src_id, dst_id) VALUES (?1, ?2, ?3)",
            )
            .and_then(|mut stmt| stmt.execute(params![rel.as_str(), src, dst]))
            .map_err(from_rusqlite)?;
        Ok(())
    }

    fn merge_single_edge(&mut self, from: &NodeKey, rel: RelType, to: &NodeKey) -> Result<()> {
        let src = self.require(from)?;
        let dst = self.require(to)?;
        self.tx
            .prepare_cached("DELETE FROM edges WHERE rel_type = ?1 AND src_id = ?2 AND dst_id <> ?3")
            .and_then(|mut stmt| stmt.execute(params![rel.as_str(), src, dst]))
            .map_err(from_rusqlite)?;
        self.merge_edge(from, rel, to)
    }

    fn commit(self) -> Result<()> {
        self.tx.commit().map_err(from_rusqlite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightgraph_core::schema::{ensure_schema, CONSTRAINTS};
    use serde_json::Value;

    fn lat(value: f64) -> Props {
        let mut props = Props::new();
        props.insert("lat".to_string(), Value::from(value));
        props
    }

    #[test]
    fn test_create_only_then_overwrite() {
        let mut store = SqliteGraphStore::open_in_memory().unwrap();
        let airport = NodeKey::airport("EPWA");

        let mut tx = store.begin().unwrap();
        tx.merge_node_create_only(&airport, &lat(52.1)).unwrap();
        tx.merge_node_create_only(&airport, &lat(0.0)).unwrap();
        tx.commit().unwrap();
        assert_eq!(
            store.node_props(&airport).unwrap().unwrap()["lat"],
            Value::from(52.1)
        );

        let mut tx = store.begin().unwrap();
        tx.merge_node_overwrite(&airport, &lat(1.5)).unwrap();
        tx.commit().unwrap();
        let props = store.node_props(&airport).unwrap().unwrap();
        assert_eq!(props["lat"], Value::from(1.5));
        assert_eq!(props["code"], Value::from("EPWA"));
    }

    #[test]
    fn test_edge_merge_is_unique() {
        let mut store = SqliteGraphStore::open_in_memory().unwrap();
        let flight = NodeKey::flight("1");
        let day = NodeKey::day("2018-03-01");

        for _ in 0..2 {
            let mut tx = store.begin().unwrap();
            tx.merge_node_overwrite(&flight, &Props::new()).unwrap();
            tx.merge_node_create_only(&day, &Props::new()).unwrap();
            tx.merge_edge(&flight, RelType::OnDay, &day).unwrap();
            tx.commit().unwrap();
        }

        assert_eq!(store.counts().unwrap().edges_of(RelType::OnDay), 1);
        assert!(store.has_edge(&flight, RelType::OnDay, &day).unwrap());
    }

    #[test]
    fn test_single_edge_drops_stale_target() {
        let mut store = SqliteGraphStore::open_in_memory().unwrap();
        let flight = NodeKey::flight("1");
        let egll = NodeKey::airport("EGLL");
        let lfpg = NodeKey::airport("LFPG");

        for ades in [&egll, &lfpg] {
            let mut tx = store.begin().unwrap();
            tx.merge_node_overwrite(&flight, &Props::new()).unwrap();
            tx.merge_node_create_only(ades, &Props::new()).unwrap();
            tx.merge_single_edge(&flight, RelType::ArrivesTo, ades).unwrap();
            tx.commit().unwrap();
        }

        assert_eq!(store.counts().unwrap().edges_of(RelType::ArrivesTo), 1);
        assert!(store.has_edge(&flight, RelType::ArrivesTo, &lfpg).unwrap());
        assert!(!store.has_edge(&flight, RelType::ArrivesTo, &egll).unwrap());
    }

    #[test]
    fn test_uncommitted_transaction_rolls_back() {
        let mut store = SqliteGraphStore::open_in_memory().unwrap();
        {
            let mut tx = store.begin().unwrap();
            tx.merge_node_create_only(&NodeKey::country("Poland"), &Props::new())
                .unwrap();
        }
        assert_eq!(store.counts().unwrap().total_nodes(), 0);
    }

    #[test]
    fn test_ensure_schema_creates_indexes_once() {
        let mut store = SqliteGraphStore::open_in_memory().unwrap();
        let first = ensure_schema(&mut store).unwrap();
        let second = ensure_schema(&mut store).unwrap();

        assert_eq!(first.created.len(), CONSTRAINTS.len());
        assert_eq!(second.already_present.len(), CONSTRAINTS.len());
    }

    #[test]
    fn test_unique_index_rejects_duplicate_insert() {
        let mut store = SqliteGraphStore::open_in_memory().unwrap();
        ensure_schema(&mut store).unwrap();

        let err = store.connection().execute(
            "INSERT INTO nodes (label, node_key) VALUES ('Airport', '[\"EPWA\"]'), ('Airport', '[\"EPWA\"]')",
            [],
        );
        assert!(err.is_err());
    }
}
