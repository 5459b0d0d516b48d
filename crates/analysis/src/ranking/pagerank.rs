//! PageRank influence scoring
//!
//! Damped power iteration over the transition matrix
//! G = (1-θ)/n · J + θ · H, where H is the row-normalized adjacency after
//! dangling rows are redistributed uniformly. G is row-stochastic, so the
//! iterate stays a probability distribution throughout.
//!
//! G is never materialized: one iteration needs only a scaled transpose
//! product against the sparse adjacency plus the dangling and
//! teleportation mass, both rank-one.

use crate::graph::AdjacencyMatrix;
use crate::ranking::rank_descending;
use citenet_common::config::PageRankConfig;
use citenet_common::errors::{AnalysisError, Result};
use citenet_common::types::NodeId;
use std::collections::HashMap;
use tracing::debug;

/// The derived transition operator for one ranking call
struct TransitionMatrix<'a> {
    adj: &'a AdjacencyMatrix,
    row_sums: Vec<f64>,
    damping: f64,
}

impl<'a> TransitionMatrix<'a> {
    fn new(adj: &'a AdjacencyMatrix, damping: f64) -> Self {
        Self {
            adj,
            row_sums: adj.row_sums(),
            damping,
        }
    }

    /// next = current · G
    fn apply_left(&self, current: &[f64]) -> Vec<f64> {
        let n = current.len();
        let n_f = n as f64;
        let theta = self.damping;

        // Split the current mass into edge-following mass (scaled by
        // out-weight) and dangling mass (spread uniformly).
        let mut scaled = vec![0.0; n];
        let mut dangling_mass = 0.0;
        let mut total_mass = 0.0;
        for i in 0..n {
            total_mass += current[i];
            if self.row_sums[i] > 0.0 {
                scaled[i] = current[i] / self.row_sums[i];
            } else {
                dangling_mass += current[i];
            }
        }

        let edge_part = self.adj.apply_transpose(&scaled);
        let teleport = (1.0 - theta) / n_f * total_mass;
        let dangling = theta * dangling_mass / n_f;

        edge_part
            .into_iter()
            .map(|e| teleport + dangling + theta * e)
            .collect()
    }
}

/// PageRank scores over one graph, index-aligned with its node ordering
#[derive(Debug, Clone)]
pub struct PageRankScores {
    ordering: Vec<NodeId>,
    scores: Vec<f64>,

    /// Iterations actually run
    pub iterations: usize,

    /// L2 distance between the last two iterates
    pub residual: f64,

    /// Whether the residual met the tolerance before the iteration cap.
    /// Hitting the cap is not an error; callers needing strict convergence
    /// inspect this flag.
    pub converged: bool,
}

impl PageRankScores {
    pub fn ordering(&self) -> &[NodeId] {
        &self.ordering
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn score_of(&self, id: NodeId) -> Option<f64> {
        let idx = self.ordering.binary_search(&id).ok()?;
        Some(self.scores[idx])
    }

    /// Nodes by rank descending
    pub fn ranking(&self) -> Vec<(NodeId, f64)> {
        rank_descending(&self.ordering, &self.scores)
    }

    /// Explicit node-id -> score mapping
    pub fn to_map(&self) -> HashMap<NodeId, f64> {
        self.ordering
            .iter()
            .copied()
            .zip(self.scores.iter().copied())
            .collect()
    }
}

/// PageRank solver
pub struct PageRank {
    config: PageRankConfig,
}

impl PageRank {
    pub fn new(config: PageRankConfig) -> Self {
        Self { config }
    }

    /// Compute the PageRank distribution of a graph's adjacency matrix.
    ///
    /// Starts from the uniform vector and iterates `next = current · G`
    /// until ‖next − current‖₂ ≤ ε·n or the iteration cap is reached,
    /// whichever comes first. An empty graph is an explicit error; a graph
    /// where every node is dangling degrades to the uniform teleportation
    /// distribution.
    pub fn compute(&self, adj: &AdjacencyMatrix) -> Result<PageRankScores> {
        let n = adj.n();
        if n == 0 {
            return Err(AnalysisError::EmptyGraph {
                context: "pagerank".into(),
            });
        }
        let theta = self.config.damping;
        if !(0.0..1.0).contains(&theta) || theta <= 0.0 {
            return Err(AnalysisError::InvalidParameter {
                name: "damping".into(),
                message: format!("must be in (0, 1), got {theta}"),
            });
        }

        let transition = TransitionMatrix::new(adj, theta);
        let tolerance = self.config.epsilon * n as f64;

        let mut current = vec![1.0 / n as f64; n];
        let mut iterations = 0;
        let mut residual = f64::INFINITY;

        while residual > tolerance && iterations < self.config.max_iterations {
            let next = transition.apply_left(&current);
            residual = l2_distance(&next, &current);
            current = next;
            iterations += 1;
            debug!(iteration = iterations, residual, "PageRank iteration");
        }

        Ok(PageRankScores {
            ordering: adj.ordering().to_vec(),
            scores: current,
            iterations,
            residual,
            converged: residual <= tolerance,
        })
    }
}

fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use citenet_common::config::PageRankConfig;

    fn solver() -> PageRank {
        PageRank::new(PageRankConfig::default())
    }

    fn tight_solver() -> PageRank {
        PageRank::new(PageRankConfig {
            damping: 0.85,
            epsilon: 1e-9,
            max_iterations: 200,
        })
    }

    #[test]
    fn test_empty_graph_fails_fast() {
        let adj = AdjacencyMatrix::from_graph(&Graph::directed());
        let result = solver().compute(&adj);
        assert!(matches!(result, Err(AnalysisError::EmptyGraph { .. })));
    }

    #[test]
    fn test_output_is_probability_distribution() {
        let mut graph = Graph::directed();
        graph.add_edge(1, 2, 1);
        graph.add_edge(2, 3, 1);
        graph.add_edge(3, 1, 2);
        graph.add_edge(1, 3, 1);
        graph.add_node(9);
        let adj = AdjacencyMatrix::from_graph(&graph);

        let scores = solver().compute(&adj).unwrap();
        let sum: f64 = scores.scores().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum was {sum}");
        assert!(scores.scores().iter().all(|&s| s >= 0.0));
    }

    #[test]
    fn test_fully_connected_equal_weights_is_uniform() {
        let mut graph = Graph::directed();
        let ids = [1u32, 2, 3, 4];
        for &a in &ids {
            for &b in &ids {
                if a != b {
                    graph.add_edge(a, b, 1);
                }
            }
        }
        let adj = AdjacencyMatrix::from_graph(&graph);

        let scores = tight_solver().compute(&adj).unwrap();
        for &s in scores.scores() {
            assert!((s - 0.25).abs() < 1e-6, "expected uniform, got {s}");
        }
    }

    #[test]
    fn test_isolated_node_keeps_positive_rank() {
        let mut graph = Graph::directed();
        graph.add_edge(1, 2, 1);
        graph.add_edge(2, 1, 1);
        graph.add_node(50);
        let adj = AdjacencyMatrix::from_graph(&graph);

        let scores = tight_solver().compute(&adj).unwrap();
        assert!(scores.score_of(50).unwrap() > 0.0);
    }

    #[test]
    fn test_all_dangling_graph_degrades_to_uniform() {
        let mut graph = Graph::directed();
        for id in [3, 7, 11] {
            graph.add_node(id);
        }
        let adj = AdjacencyMatrix::from_graph(&graph);

        let scores = tight_solver().compute(&adj).unwrap();
        for &s in scores.scores() {
            assert!((s - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hitting_iteration_cap_is_not_an_error() {
        let mut graph = Graph::directed();
        graph.add_edge(1, 2, 1);
        graph.add_edge(2, 3, 1);
        graph.add_edge(3, 1, 1);
        let adj = AdjacencyMatrix::from_graph(&graph);

        let capped = PageRank::new(PageRankConfig {
            damping: 0.85,
            epsilon: 1e-15,
            max_iterations: 2,
        });
        let scores = capped.compute(&adj).unwrap();
        assert_eq!(scores.iterations, 2);
        assert!(!scores.converged);
        assert!(scores.residual.is_finite());
    }

    #[test]
    fn test_cited_hub_outranks_its_citers() {
        // 1, 3, 4 all cite 2
        let mut graph = Graph::directed();
        graph.add_edge(1, 2, 1);
        graph.add_edge(3, 2, 1);
        graph.add_edge(4, 2, 1);
        let adj = AdjacencyMatrix::from_graph(&graph);

        let scores = tight_solver().compute(&adj).unwrap();
        let ranking = scores.ranking();
        assert_eq!(ranking[0].0, 2);
    }

    #[test]
    fn test_invalid_damping_rejected() {
        let mut graph = Graph::directed();
        graph.add_edge(1, 2, 1);
        let adj = AdjacencyMatrix::from_graph(&graph);

        let bad = PageRank::new(PageRankConfig {
            damping: 1.0,
            epsilon: 1e-3,
            max_iterations: 20,
        });
        assert!(matches!(
            bad.compute(&adj),
            Err(AnalysisError::InvalidParameter { .. })
        ));
    }
}
