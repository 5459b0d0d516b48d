//! HITS hubs and authorities
//!
//! Power-iteration estimator over a directed graph or subgraph, plus the
//! ranking utilities shared with the eigen-decomposition estimator. Node
//! ordering is always ascending by id so repeated runs line up.

use crate::graph::{AdjacencyMatrix, Graph};
use crate::ranking::rank_descending;
use citenet_common::errors::{AnalysisError, Result};
use citenet_common::types::NodeId;
use tracing::debug;

/// Hub/authority score columns, index-aligned with `ordering`.
/// Power iteration yields one column per side; the eigen estimator yields
/// `neigs` columns (column 0 is the principal vector).
#[derive(Debug, Clone)]
pub struct HitsScores {
    pub ordering: Vec<NodeId>,
    pub authorities: Vec<Vec<f64>>,
    pub hubs: Vec<Vec<f64>>,
}

impl HitsScores {
    /// Nodes by principal authority score descending
    pub fn authority_ranking(&self) -> Vec<(NodeId, f64)> {
        rank_descending(&self.ordering, &self.authorities[0])
    }

    /// Nodes by principal hub score descending
    pub fn hub_ranking(&self) -> Vec<(NodeId, f64)> {
        rank_descending(&self.ordering, &self.hubs[0])
    }

    /// Authority ranking with never-cited nodes optionally excluded, for
    /// comparison against citation-count rankings
    pub fn authority_ranking_in_cited(
        &self,
        graph: &Graph,
        drop_zero_citations: bool,
    ) -> Vec<(NodeId, f64)> {
        self.authority_ranking()
            .into_iter()
            .filter(|&(id, _)| !drop_zero_citations || graph.in_degree(id) > 0)
            .collect()
    }
}

/// Compute hub and authority vectors by k rounds of power iteration:
/// x ← Aᵗy, y ← Ax, both normalized to unit L2 after every round.
/// Termination is purely count-based; k is small for interactive subgraph
/// queries and on the order of 1000 for full-graph runs.
pub fn hits_power_iteration(adj: &AdjacencyMatrix, k: usize) -> Result<HitsScores> {
    let n = adj.n();
    if n == 0 {
        return Err(AnalysisError::EmptyGraph {
            context: "hits power iteration".into(),
        });
    }

    debug!(n, k, "HITS power iteration");

    let mut authorities = vec![1.0; n];
    let mut hubs = vec![1.0; n];

    for _ in 0..k {
        authorities = adj.apply_transpose(&hubs);
        hubs = adj.apply(&authorities);
        normalize_l2(&mut authorities);
        normalize_l2(&mut hubs);
    }

    Ok(HitsScores {
        ordering: adj.ordering().to_vec(),
        authorities: vec![authorities],
        hubs: vec![hubs],
    })
}

/// Scale to unit L2 norm. An all-zero vector (edgeless graph) is left
/// untouched rather than divided by zero.
pub(crate) fn normalize_l2(v: &mut [f64]) {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Top-c entries from a non-principal eigenvector pair: the authority and
/// hub columns at `eig_index` are concatenated and the largest entries
/// taken. With the sign ambiguity of non-principal vectors, the extreme
/// positive side is read as the authority cluster. An `eig_index` beyond
/// the stored columns is rejected, not a panic; power-iteration scores
/// only ever carry the principal column.
pub fn non_principal_authorities(
    scores: &HitsScores,
    eig_index: usize,
    c: usize,
) -> Result<Vec<NodeId>> {
    extremal_concat(scores, eig_index, c, true)
}

/// Bottom-c entries from a non-principal eigenvector pair: the opposite
/// extreme of the concatenated columns, read as the hub cluster.
pub fn non_principal_hubs(scores: &HitsScores, eig_index: usize, c: usize) -> Result<Vec<NodeId>> {
    extremal_concat(scores, eig_index, c, false)
}

fn extremal_concat(
    scores: &HitsScores,
    eig_index: usize,
    c: usize,
    top: bool,
) -> Result<Vec<NodeId>> {
    let columns = scores.authorities.len().min(scores.hubs.len());
    if eig_index >= columns {
        return Err(AnalysisError::InvalidParameter {
            name: "eig_index".into(),
            message: format!("must be < {columns}, got {eig_index}"),
        });
    }
    let n = scores.ordering.len();
    let mut concat: Vec<(usize, f64)> = scores.authorities[eig_index]
        .iter()
        .chain(scores.hubs[eig_index].iter())
        .copied()
        .enumerate()
        .collect();
    if top {
        concat.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    } else {
        concat.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    }
    Ok(concat
        .into_iter()
        .take(c)
        .map(|(i, _)| scores.ordering[i % n])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn l2(v: &[f64]) -> f64 {
        v.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    #[test]
    fn test_empty_graph_is_an_error() {
        let adj = AdjacencyMatrix::from_graph(&Graph::directed());
        assert!(matches!(
            hits_power_iteration(&adj, 10),
            Err(AnalysisError::EmptyGraph { .. })
        ));
    }

    #[test]
    fn test_vectors_have_unit_norm() {
        let mut graph = Graph::directed();
        graph.add_edge(1, 2, 1);
        graph.add_edge(3, 2, 1);
        graph.add_edge(2, 4, 1);
        let adj = AdjacencyMatrix::from_graph(&graph);

        let scores = hits_power_iteration(&adj, 25).unwrap();
        assert!((l2(&scores.authorities[0]) - 1.0).abs() < 1e-12);
        assert!((l2(&scores.hubs[0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_pair_splits_evenly() {
        // One bidirectional edge: both nodes are equally hub and authority
        let mut graph = Graph::directed();
        graph.add_edge(1, 2, 1);
        graph.add_edge(2, 1, 1);
        let adj = AdjacencyMatrix::from_graph(&graph);

        let scores = hits_power_iteration(&adj, 50).unwrap();
        let expected = 1.0 / 2.0_f64.sqrt();
        for side in [&scores.authorities[0], &scores.hubs[0]] {
            assert!((side[0] - expected).abs() < 1e-9);
            assert!((side[1] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_most_cited_node_is_top_authority() {
        let mut graph = Graph::directed();
        graph.add_edge(1, 2, 1);
        graph.add_edge(3, 2, 1);
        graph.add_edge(4, 2, 1);
        graph.add_edge(1, 3, 1);
        let adj = AdjacencyMatrix::from_graph(&graph);

        let scores = hits_power_iteration(&adj, 100).unwrap();
        assert_eq!(scores.authority_ranking()[0].0, 2);
        // 1 points at both 2 and 3, the strongest authorities
        assert_eq!(scores.hub_ranking()[0].0, 1);
    }

    #[test]
    fn test_zero_citation_exclusion() {
        let mut graph = Graph::directed();
        graph.add_edge(1, 2, 1);
        graph.add_edge(3, 2, 1);
        let adj = AdjacencyMatrix::from_graph(&graph);

        let scores = hits_power_iteration(&adj, 20).unwrap();
        let full = scores.authority_ranking_in_cited(&graph, false);
        let cited = scores.authority_ranking_in_cited(&graph, true);

        assert_eq!(full.len(), 3);
        assert_eq!(cited.len(), 1);
        assert_eq!(cited[0].0, 2);
    }

    #[test]
    fn test_non_principal_extraction_maps_back_to_ids() {
        let scores = HitsScores {
            ordering: vec![10, 20, 30],
            authorities: vec![vec![0.0; 3], vec![0.9, -0.5, 0.1]],
            hubs: vec![vec![0.0; 3], vec![-0.8, 0.7, 0.0]],
        };

        // concatenated column: [0.9, -0.5, 0.1, -0.8, 0.7, 0.0]
        assert_eq!(
            non_principal_authorities(&scores, 1, 2).unwrap(),
            vec![10, 20]
        );
        assert_eq!(non_principal_hubs(&scores, 1, 2).unwrap(), vec![10, 20]);
    }

    #[test]
    fn test_non_principal_index_beyond_columns_rejected() {
        let mut graph = Graph::directed();
        graph.add_edge(1, 2, 1);
        let adj = AdjacencyMatrix::from_graph(&graph);

        // power iteration carries the principal column only
        let scores = hits_power_iteration(&adj, 10).unwrap();
        assert!(matches!(
            non_principal_authorities(&scores, 1, 2),
            Err(AnalysisError::InvalidParameter { .. })
        ));
        assert!(matches!(
            non_principal_hubs(&scores, 1, 2),
            Err(AnalysisError::InvalidParameter { .. })
        ));
    }
}
