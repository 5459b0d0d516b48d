//! Eigen-decomposition HITS estimator
//!
//! Authorities are the largest-magnitude eigenvectors of AᵗA, hubs those
//! of AAᵗ. Both Gram operators are applied matrix-free through the sparse
//! adjacency, and eigenvectors are extracted by power iteration with
//! Gram-Schmidt deflation against the vectors already accepted.
//!
//! The sparse solve can converge degenerately, returning a principal
//! vector whose components are all tiny and non-positive. Such vectors
//! are rejected and the solve restarted from a fresh random vector, but
//! only up to a configured attempt limit; past the limit the failure is
//! surfaced as an explicit error instead of retrying forever.

use crate::graph::AdjacencyMatrix;
use crate::ranking::hits::{normalize_l2, HitsScores};
use citenet_common::errors::{AnalysisError, Result};
use rand::Rng;
use tracing::{debug, warn};

/// Components below this magnitude are noise from the iterative solve and
/// get zeroed before the acceptance check
const ZERO_THRESHOLD: f64 = 1e-10;

/// Inner power-iteration round cap per eigenvector
const MAX_POWER_ROUNDS: usize = 500;

/// Residual below which an eigenvector is considered settled
const SETTLE_TOLERANCE: f64 = 1e-12;

/// Which Gram operator a solve runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GramSide {
    /// AᵗA - eigenvectors are authority score columns
    Authority,
    /// AAᵗ - eigenvectors are hub score columns
    Hub,
}

/// Sparse eigensolver for the HITS Gram matrices
pub struct EigenSolver {
    /// Number of largest-magnitude eigenvectors to extract
    pub neigs: usize,

    /// Attempt cap for the stability-retry loop
    pub max_retries: usize,
}

impl EigenSolver {
    pub fn new(neigs: usize, max_retries: usize) -> Self {
        Self { neigs, max_retries }
    }

    /// Hub and authority eigenvector columns for a graph, one independent
    /// solve per side. The RNG drives the random restarts; seed it for
    /// reproducible runs.
    pub fn hubs_authorities<R: Rng>(
        &self,
        adj: &AdjacencyMatrix,
        rng: &mut R,
    ) -> Result<HitsScores> {
        let authorities = self.principal_vectors(adj, GramSide::Authority, rng)?;
        let hubs = self.principal_vectors(adj, GramSide::Hub, rng)?;
        Ok(HitsScores {
            ordering: adj.ordering().to_vec(),
            authorities,
            hubs,
        })
    }

    /// The top `neigs` eigenvectors of one Gram side, in descending
    /// eigenvalue order, each zero-thresholded and stability-checked.
    pub fn principal_vectors<R: Rng>(
        &self,
        adj: &AdjacencyMatrix,
        side: GramSide,
        rng: &mut R,
    ) -> Result<Vec<Vec<f64>>> {
        let n = adj.n();
        if n == 0 {
            return Err(AnalysisError::EmptyGraph {
                context: "hits eigen decomposition".into(),
            });
        }
        if self.neigs == 0 || self.neigs > n {
            return Err(AnalysisError::InvalidParameter {
                name: "neigs".into(),
                message: format!("must be in 1..={n}, got {}", self.neigs),
            });
        }

        for attempt in 1..=self.max_retries {
            if let Some(vectors) = self.solve_once(adj, side, rng) {
                debug!(?side, attempt, "Eigensolve accepted");
                return Ok(vectors);
            }
            warn!(?side, attempt, "Degenerate eigensolve rejected, retrying");
        }
        Err(AnalysisError::EigenNonConvergence {
            attempts: self.max_retries,
        })
    }

    /// One full solve: extract `neigs` vectors by deflated power
    /// iteration, then apply the stability policy. Returns None when any
    /// requested eigen-index fails the acceptance check.
    fn solve_once<R: Rng>(
        &self,
        adj: &AdjacencyMatrix,
        side: GramSide,
        rng: &mut R,
    ) -> Option<Vec<Vec<f64>>> {
        let n = adj.n();
        let mut accepted: Vec<Vec<f64>> = Vec::with_capacity(self.neigs);

        for _ in 0..self.neigs {
            let mut v: Vec<f64> = (0..n).map(|_| rng.gen::<f64>()).collect();
            orthogonalize(&mut v, &accepted);
            normalize_l2(&mut v);

            for _ in 0..MAX_POWER_ROUNDS {
                let mut next = apply_gram(adj, side, &v);
                orthogonalize(&mut next, &accepted);
                let norm = next.iter().map(|x| x * x).sum::<f64>().sqrt();
                if norm == 0.0 {
                    // The deflated operator annihilated v, so v is already
                    // a unit null-space vector: a valid eigenvector for
                    // eigenvalue 0. Keep it instead of the zero image.
                    break;
                }
                for x in next.iter_mut() {
                    *x /= norm;
                }
                let settled = v
                    .iter()
                    .zip(&next)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>()
                    < SETTLE_TOLERANCE;
                v = next;
                if settled {
                    break;
                }
            }
            accepted.push(v);
        }

        // Stability policy: zero out solver noise, then reject the solve
        // if any vector has no strictly positive component left.
        for vector in accepted.iter_mut() {
            for x in vector.iter_mut() {
                if x.abs() < ZERO_THRESHOLD {
                    *x = 0.0;
                }
            }
            if vector.iter().all(|&x| x <= 0.0) {
                return None;
            }
        }
        Some(accepted)
    }
}

/// v ← (AᵗA)v or (AAᵗ)v without materializing the Gram matrix
fn apply_gram(adj: &AdjacencyMatrix, side: GramSide, v: &[f64]) -> Vec<f64> {
    match side {
        GramSide::Authority => adj.apply_transpose(&adj.apply(v)),
        GramSide::Hub => adj.apply(&adj.apply_transpose(v)),
    }
}

/// Remove the components of `v` along each basis vector (Gram-Schmidt)
fn orthogonalize(v: &mut [f64], basis: &[Vec<f64>]) {
    for b in basis {
        let dot: f64 = v.iter().zip(b).map(|(x, y)| x * y).sum();
        for (x, y) in v.iter_mut().zip(b) {
            *x -= dot * y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn star_graph() -> AdjacencyMatrix {
        // 1 and 3 cite 2; 4 cites 5
        let mut graph = Graph::directed();
        graph.add_edge(1, 2, 1);
        graph.add_edge(3, 2, 1);
        graph.add_edge(4, 5, 1);
        AdjacencyMatrix::from_graph(&graph)
    }

    #[test]
    fn test_principal_authority_is_most_cited_node() {
        let adj = star_graph();
        let solver = EigenSolver::new(1, 5);
        let scores = solver.hubs_authorities(&adj, &mut rng()).unwrap();

        // ordering [1,2,3,4,5]; node 2 carries the dominant eigenvalue
        let auth = &scores.authorities[0];
        let top = auth
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(scores.ordering[top], 2);
    }

    #[test]
    fn test_accepted_vectors_have_a_positive_component() {
        let adj = star_graph();
        let solver = EigenSolver::new(2, 5);
        let scores = solver.hubs_authorities(&adj, &mut rng()).unwrap();

        for column in scores.authorities.iter().chain(scores.hubs.iter()) {
            assert!(column.iter().any(|&x| x > 0.0));
        }
    }

    #[test]
    fn test_second_eigenvector_finds_secondary_community() {
        let adj = star_graph();
        let solver = EigenSolver::new(2, 5);
        let authorities = solver
            .principal_vectors(&adj, GramSide::Authority, &mut rng())
            .unwrap();

        // AᵗA eigenvalues: 2 at node 2, 1 at node 5
        let second = &authorities[1];
        let top = second
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert_eq!(top, 4); // index of node 5
    }

    #[test]
    fn test_rank_deficient_gram_keeps_null_space_vectors() {
        // 1 cites 2 plus an isolated node: AᵗA has rank 1, so the second
        // eigenvector must come out of the null space
        let mut graph = Graph::directed();
        graph.add_edge(1, 2, 1);
        graph.add_node(3);
        let adj = AdjacencyMatrix::from_graph(&graph);

        let solver = EigenSolver::new(2, 5);
        let authorities = solver
            .principal_vectors(&adj, GramSide::Authority, &mut rng())
            .unwrap();

        // principal vector concentrates on node 2; the second is a unit
        // eigenvalue-0 vector supported on the never-cited nodes
        let second = &authorities[1];
        let norm: f64 = second.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
        assert!(second[1].abs() < 1e-9); // index of node 2
        assert!(second.iter().any(|&x| x > 0.0));
    }

    #[test]
    fn test_edgeless_graph_solves_in_the_null_space() {
        let mut graph = Graph::directed();
        graph.add_node(1);
        graph.add_node(2);
        let adj = AdjacencyMatrix::from_graph(&graph);

        let solver = EigenSolver::new(1, 3);
        let authorities = solver
            .principal_vectors(&adj, GramSide::Authority, &mut rng())
            .unwrap();
        let norm: f64 = authorities[0].iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_graph_is_an_error() {
        let adj = AdjacencyMatrix::from_graph(&Graph::directed());
        let solver = EigenSolver::new(1, 5);
        assert!(matches!(
            solver.principal_vectors(&adj, GramSide::Authority, &mut rng()),
            Err(AnalysisError::EmptyGraph { .. })
        ));
    }

    #[test]
    fn test_neigs_larger_than_graph_rejected() {
        let mut graph = Graph::directed();
        graph.add_edge(1, 2, 1);
        let adj = AdjacencyMatrix::from_graph(&graph);

        let solver = EigenSolver::new(10, 5);
        assert!(matches!(
            solver.principal_vectors(&adj, GramSide::Authority, &mut rng()),
            Err(AnalysisError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_eigen_and_power_iteration_agree_on_top_authority() {
        let mut graph = Graph::directed();
        graph.add_edge(1, 4, 1);
        graph.add_edge(2, 4, 1);
        graph.add_edge(3, 4, 1);
        graph.add_edge(2, 5, 1);
        let adj = AdjacencyMatrix::from_graph(&graph);

        let eigen = EigenSolver::new(1, 5)
            .hubs_authorities(&adj, &mut rng())
            .unwrap();
        let power = crate::ranking::hits_power_iteration(&adj, 200).unwrap();

        assert_eq!(
            eigen.authority_ranking()[0].0,
            power.authority_ranking()[0].0
        );
    }
}
