//! In-memory graph representation
//!
//! Holds the ambient co-authorship (undirected) and citation (directed)
//! graphs for one batch run. Built once per run and treated as immutable
//! by the ranking and query layers.

mod builder;
mod matrix;
mod store;

pub use builder::{
    aggregate_weights, all_nodes, canonicalize_and_sort, coauthorship_graph, edges_from_records,
};
pub use matrix::AdjacencyMatrix;
pub use store::{directed_edges_from_resolved, resolve_reference, GraphStore};

use citenet_common::types::NodeId;
use std::collections::{BTreeSet, HashMap};

/// Weighted graph over integer node ids
///
/// The node set is kept separately from the adjacency so that isolated
/// nodes (singleton authors, never-cited articles) survive as real nodes.
/// Node iteration order is always ascending by id; this is the fixed
/// ordering every matrix and score vector is keyed on.
#[derive(Debug, Clone)]
pub struct Graph {
    directed: bool,

    /// node -> (successor, weight); for undirected graphs this holds both
    /// orientations of every edge
    outgoing: HashMap<NodeId, Vec<(NodeId, u32)>>,

    /// node -> (predecessor, weight); mirrors `outgoing` when undirected
    incoming: HashMap<NodeId, Vec<(NodeId, u32)>>,

    nodes: BTreeSet<NodeId>,
}

impl Graph {
    /// Create an empty directed graph
    pub fn directed() -> Self {
        Self::new(true)
    }

    /// Create an empty undirected graph
    pub fn undirected() -> Self {
        Self::new(false)
    }

    fn new(directed: bool) -> Self {
        Self {
            directed,
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            nodes: BTreeSet::new(),
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Add a node with no edges. Idempotent.
    pub fn add_node(&mut self, id: NodeId) {
        self.nodes.insert(id);
    }

    /// Add a weighted edge, inserting both endpoints as nodes. Adding the
    /// same edge again accumulates its weight.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, weight: u32) {
        self.nodes.insert(source);
        self.nodes.insert(target);

        Self::insert_adjacent(&mut self.outgoing, source, target, weight);
        Self::insert_adjacent(&mut self.incoming, target, source, weight);
        if !self.directed && source != target {
            Self::insert_adjacent(&mut self.outgoing, target, source, weight);
            Self::insert_adjacent(&mut self.incoming, source, target, weight);
        }
    }

    fn insert_adjacent(
        adj: &mut HashMap<NodeId, Vec<(NodeId, u32)>>,
        from: NodeId,
        to: NodeId,
        weight: u32,
    ) {
        let neighbors = adj.entry(from).or_default();
        match neighbors.iter_mut().find(|(n, _)| *n == to) {
            Some((_, w)) => *w += weight,
            None => neighbors.push((to, weight)),
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// Nodes in ascending id order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored adjacency entries (an undirected edge counts once)
    pub fn edge_count(&self) -> usize {
        let entries: usize = self.outgoing.values().map(|v| v.len()).sum();
        if self.directed {
            entries
        } else {
            let loops: usize = self
                .outgoing
                .iter()
                .map(|(n, v)| v.iter().filter(|(m, _)| m == n).count())
                .sum();
            (entries - loops) / 2 + loops
        }
    }

    /// Successors of a node with edge weights; empty for unknown nodes
    pub fn successors(&self, id: NodeId) -> &[(NodeId, u32)] {
        self.outgoing.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Predecessors of a node with edge weights; empty for unknown nodes
    pub fn predecessors(&self, id: NodeId) -> &[(NodeId, u32)] {
        self.incoming.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// In-degree: number of distinct predecessors (citation count for the
    /// citation graph)
    pub fn in_degree(&self, id: NodeId) -> usize {
        self.incoming.get(&id).map(|v| v.len()).unwrap_or(0)
    }

    /// Out-degree: number of distinct successors
    pub fn out_degree(&self, id: NodeId) -> usize {
        self.outgoing.get(&id).map(|v| v.len()).unwrap_or(0)
    }

    /// Node-induced subgraph: the given nodes (restricted to ones actually
    /// present) plus every edge whose endpoints both survive
    pub fn induced_subgraph(&self, keep: &BTreeSet<NodeId>) -> Graph {
        let mut sub = Graph::new(self.directed);
        for &id in keep {
            if self.nodes.contains(&id) {
                sub.add_node(id);
            }
        }
        let kept: Vec<NodeId> = sub.nodes.iter().copied().collect();
        for id in kept {
            for &(target, weight) in self.successors(id) {
                if sub.nodes.contains(&target) {
                    // undirected edges would otherwise be inserted twice
                    if !self.directed && target < id {
                        continue;
                    }
                    sub.add_edge(id, target, weight);
                }
            }
        }
        sub
    }
}
