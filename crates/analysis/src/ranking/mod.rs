//! Structural influence ranking
//!
//! Two from-scratch engines over the sparse adjacency matrix: damped
//! PageRank power iteration and HITS hubs/authorities (power iteration
//! and eigen-decomposition variants). Score vectors are index-aligned
//! with the matrix ordering and only valid relative to the graph or
//! subgraph they were computed on.

pub mod eigen;
pub mod hits;
pub mod pagerank;

pub use eigen::{EigenSolver, GramSide};
pub use hits::{hits_power_iteration, HitsScores};
pub use pagerank::{PageRank, PageRankScores};

use citenet_common::types::NodeId;

/// Order nodes by score descending. The ordering slice is ascending by id
/// and the sort is stable, so ties keep ascending id order.
pub fn rank_descending(ordering: &[NodeId], scores: &[f64]) -> Vec<(NodeId, f64)> {
    let mut ranked: Vec<(NodeId, f64)> = ordering
        .iter()
        .copied()
        .zip(scores.iter().copied())
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}
