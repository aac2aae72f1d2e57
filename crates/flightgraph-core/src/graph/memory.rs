//! In-memory graph store
//!
//! Ordered maps keyed by [`NodeKey`]; a transaction stages a copy of the
//! graph and swaps it in on commit. No locking; the import pipeline is
//! single-threaded.

use super::{ConstraintStatus, GraphCounts, GraphStore, GraphTxn};
use crate::errors::{ExError, ExErrorKind, ExResult, FlightGraphError};
use crate::model::{NodeKey, Props, RelType};
use crate::schema::UniqueConstraint;
use std::collections::{BTreeMap, BTreeSet};

type Edge = (NodeKey, RelType, NodeKey);

/// In-memory property graph
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    nodes: BTreeMap<NodeKey, Props>,
    edges: BTreeSet<Edge>,
    constraints: BTreeSet<String>,
    commit_attempts: usize,
    fail_on_commit: Option<usize>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the n-th commit attempt (1-based) fail, leaving the graph as it was
    pub fn fail_on_commit(mut self, n: usize) -> Self {
        self.fail_on_commit = Some(n);
        self
    }

    /// Properties of a node, including its key properties
    pub fn node(&self, key: &NodeKey) -> Option<&Props> {
        self.nodes.get(key)
    }

    pub fn has_edge(&self, from: &NodeKey, rel: RelType, to: &NodeKey) -> bool {
        self.edges.contains(&(from.clone(), rel, to.clone()))
    }

    /// Outgoing edges of one type from a node
    pub fn targets(&self, from: &NodeKey, rel: RelType) -> Vec<&NodeKey> {
        self.edges
            .iter()
            .filter(|(src, r, _)| src == from && *r == rel)
            .map(|(_, _, dst)| dst)
            .collect()
    }

    pub fn constraint_names(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().map(String::as_str)
    }

    pub fn commit_attempts(&self) -> usize {
        self.commit_attempts
    }
}

/// Transaction over a [`MemoryGraph`]
pub struct MemoryTxn<'a> {
    graph: &'a mut MemoryGraph,
    nodes: BTreeMap<NodeKey, Props>,
    edges: BTreeSet<Edge>,
}

impl GraphTxn for MemoryTxn<'_> {
    fn merge_node_create_only(&mut self, key: &NodeKey, props: &Props) -> ExResult<()> {
        self.nodes.entry(key.clone()).or_insert_with(|| {
            let mut all = props.clone();
            all.extend(key.key_props());
            all
        });
        Ok(())
    }

    fn merge_node_overwrite(&mut self, key: &NodeKey, props: &Props) -> ExResult<()> {
        let node = self
            .nodes
            .entry(key.clone())
            .or_insert_with(|| key.key_props());
        node.extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    fn merge_edge(&mut self, from: &NodeKey, rel: RelType, to: &NodeKey) -> ExResult<()> {
        for endpoint in [from, to] {
            if !self.nodes.contains_key(endpoint) {
                return Err(FlightGraphError::MissingNode {
                    label: endpoint.label().to_string(),
                    key: endpoint.canonical(),
                }
                .into());
            }
        }
        self.edges.insert((from.clone(), rel, to.clone()));
        Ok(())
    }

    fn merge_single_edge(&mut self, from: &NodeKey, rel: RelType, to: &NodeKey) -> ExResult<()> {
        self.edges
            .retain(|(src, r, dst)| !(src == from && *r == rel && dst != to));
        self.merge_edge(from, rel, to)
    }

    fn commit(self) -> ExResult<()> {
        self.graph.commit_attempts += 1;
        if self.graph.fail_on_commit == Some(self.graph.commit_attempts) {
            return Err(ExError::new(ExErrorKind::Persistence)
                .with_op("commit")
                .with_message("injected commit failure"));
        }
        self.graph.nodes = self.nodes;
        self.graph.edges = self.edges;
        Ok(())
    }
}

impl GraphStore for MemoryGraph {
    type Txn<'a> = MemoryTxn<'a>;

    fn begin(&mut self) -> ExResult<MemoryTxn<'_>> {
        let nodes = self.nodes.clone();
        let edges = self.edges.clone();
        Ok(MemoryTxn {
            graph: self,
            nodes,
            edges,
        })
    }

    fn ensure_unique_constraint(
        &mut self,
        constraint: &UniqueConstraint,
    ) -> ExResult<ConstraintStatus> {
        // Nodes are keyed by NodeKey, so existing data can never violate one.
        if self.constraints.insert(constraint.name.to_string()) {
            Ok(ConstraintStatus::Created)
        } else {
            Ok(ConstraintStatus::AlreadyPresent)
        }
    }

    fn counts(&self) -> ExResult<GraphCounts> {
        let mut counts = GraphCounts::default();
        for key in self.nodes.keys() {
            *counts.nodes.entry(key.label()).or_insert(0) += 1;
        }
        for (_, rel, _) in &self.edges {
            *counts.edges.entry(*rel).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
