//! Storage-agnostic graph primitives
//!
//! The ingestion core writes through a handful of primitives only:
//! create-only node merge, overwriting node merge, unique edge merge and
//! its single-target variant, all inside a store transaction. Any backend implementing [`GraphStore`]
//! can host the flight graph.

pub mod memory;

use crate::errors::ExResult;
use crate::model::{Label, NodeKey, Props, RelType};
use crate::schema::UniqueConstraint;
use std::collections::BTreeMap;

pub use memory::{MemoryGraph, MemoryTxn};

/// Outcome of declaring a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintStatus {
    Created,
    AlreadyPresent,
}

/// Node and relationship counts, used for reporting and verification
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphCounts {
    pub nodes: BTreeMap<Label, usize>,
    pub edges: BTreeMap<RelType, usize>,
}

impl GraphCounts {
    pub fn nodes_of(&self, label: Label) -> usize {
        self.nodes.get(&label).copied().unwrap_or(0)
    }

    pub fn edges_of(&self, rel: RelType) -> usize {
        self.edges.get(&rel).copied().unwrap_or(0)
    }

    pub fn total_nodes(&self) -> usize {
        self.nodes.values().sum()
    }

    pub fn total_edges(&self) -> usize {
        self.edges.values().sum()
    }
}

/// One open write transaction
///
/// Dropping a transaction without calling [`GraphTxn::commit`] discards
/// every write made through it.
pub trait GraphTxn {
    /// Create the node if absent; an existing node is left untouched
    fn merge_node_create_only(&mut self, key: &NodeKey, props: &Props) -> ExResult<()>;

    /// Create the node if absent; always set `props` on it
    fn merge_node_overwrite(&mut self, key: &NodeKey, props: &Props) -> ExResult<()>;

    /// Create the `from -[rel]-> to` edge unless it already exists
    ///
    /// Both endpoints must have been merged earlier (in this or a committed
    /// transaction).
    fn merge_edge(&mut self, from: &NodeKey, rel: RelType, to: &NodeKey) -> ExResult<()>;

    /// Make `from -[rel]-> to` the only `rel` edge leaving `from`
    ///
    /// Any `rel` edge from `from` to another node is removed first. Used for
    /// relationships a node has exactly one of.
    fn merge_single_edge(&mut self, from: &NodeKey, rel: RelType, to: &NodeKey) -> ExResult<()>;

    fn commit(self) -> ExResult<()>
    where
        Self: Sized;
}

/// A backing graph store
pub trait GraphStore {
    type Txn<'a>: GraphTxn
    where
        Self: 'a;

    /// Open a write transaction
    fn begin(&mut self) -> ExResult<Self::Txn<'_>>;

    /// Idempotently declare a uniqueness constraint
    ///
    /// Must fail with a schema error when existing data violates it.
    fn ensure_unique_constraint(
        &mut self,
        constraint: &UniqueConstraint,
    ) -> ExResult<ConstraintStatus>;

    /// Count nodes per label and edges per relationship type
    fn counts(&self) -> ExResult<GraphCounts>;

    /// Release the store's resources
    fn close(self) -> ExResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}
