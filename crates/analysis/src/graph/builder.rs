//! Co-authorship edge construction
//!
//! Turns per-article author lists into canonical weighted edges and the
//! full node set. Articles with a single author contribute no edge but
//! their author must still end up in the graph, so the node set is
//! derived from all records, not just the multi-author ones.
//!
//! Precondition: a record never lists the same author id twice. The
//! upstream disambiguation step guarantees this; it is not re-checked here.

use super::Graph;
use citenet_common::types::NodeId;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// All unordered author pairs from every record with at least two authors.
/// Pairs repeat across records; duplicates are what the weights count.
pub fn edges_from_records(author_lists: &[Vec<NodeId>]) -> Vec<(NodeId, NodeId)> {
    let mut edges = Vec::new();
    for authors in author_lists.iter().filter(|a| a.len() > 1) {
        for (i, &a) in authors.iter().enumerate() {
            for &b in &authors[i + 1..] {
                edges.push((a, b));
            }
        }
    }
    edges
}

/// Reorder every pair to (min, max), then sort the whole list.
/// Canonicalization must happen before counting so that a collaboration
/// is detected regardless of the original pair orientation.
pub fn canonicalize_and_sort(edges: Vec<(NodeId, NodeId)>) -> Vec<(NodeId, NodeId)> {
    let mut canonical: Vec<(NodeId, NodeId)> = edges
        .into_iter()
        .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
        .collect();
    canonical.sort_unstable();
    canonical
}

/// Count identical canonical pairs into an adjacency map:
/// node -> { neighbor -> collaboration count }
pub fn aggregate_weights(
    sorted_edges: &[(NodeId, NodeId)],
) -> BTreeMap<NodeId, BTreeMap<NodeId, u32>> {
    let mut adjacency: BTreeMap<NodeId, BTreeMap<NodeId, u32>> = BTreeMap::new();
    for &(a, b) in sorted_edges {
        *adjacency.entry(a).or_default().entry(b).or_default() += 1;
    }
    adjacency
}

/// Deduplicated union of every author id across all records, including
/// singleton authors with no co-authorship edge.
pub fn all_nodes(author_lists: &[Vec<NodeId>]) -> BTreeSet<NodeId> {
    author_lists.iter().flatten().copied().collect()
}

/// Build the full undirected co-authorship graph from per-article author
/// lists: weighted edges from multi-author records, plus every author as
/// a node even when isolated.
pub fn coauthorship_graph(author_lists: &[Vec<NodeId>]) -> Graph {
    let edges = canonicalize_and_sort(edges_from_records(author_lists));
    let weighted = aggregate_weights(&edges);

    let mut graph = Graph::undirected();
    for (a, neighbors) in &weighted {
        for (&b, &weight) in neighbors {
            graph.add_edge(*a, b, weight);
        }
    }
    for id in all_nodes(author_lists) {
        graph.add_node(id);
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        records = author_lists.len(),
        "Co-authorship graph built"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_author_records_contribute_no_edge() {
        let records = vec![vec![1], vec![1, 2], vec![1, 2, 3]];
        let edges = edges_from_records(&records);

        // record 2 yields (1,2); record 3 yields (1,2), (1,3), (2,3)
        assert_eq!(edges, vec![(1, 2), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_canonicalize_and_sort() {
        let edges = vec![(2, 1), (1, 2), (1, 3)];
        let canonical = canonicalize_and_sort(edges);
        assert_eq!(canonical, vec![(1, 2), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_aggregate_weights_counts_duplicates() {
        let sorted = vec![(1, 2), (1, 2), (1, 3)];
        let weighted = aggregate_weights(&sorted);

        assert_eq!(weighted[&1][&2], 2);
        assert_eq!(weighted[&1][&3], 1);
    }

    #[test]
    fn test_all_nodes_keeps_singleton_authors() {
        let records = vec![vec![1], vec![1, 2]];
        let nodes = all_nodes(&records);
        assert_eq!(nodes.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_coauthorship_graph_end_to_end() {
        let records = vec![vec![1], vec![1, 2], vec![1, 2, 3], vec![9]];
        let graph = coauthorship_graph(&records);

        // 1 and 2 collaborated twice, the rest once
        assert_eq!(graph.successors(1), &[(2, 2), (3, 1)]);
        assert_eq!(graph.successors(3), &[(1, 1), (2, 1)]);

        // 9 never collaborated but is still a node
        assert!(graph.contains(9));
        assert_eq!(graph.out_degree(9), 0);
        assert_eq!(graph.node_count(), 4);
    }
}
