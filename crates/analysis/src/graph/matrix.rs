//! Sparse adjacency matrix over an explicit node ordering
//!
//! Ranking math never touches node ids directly: scores are index-aligned
//! arrays keyed by the ordering stored here (node ids ascending). The
//! matrix is rebuilt per ranking call and never mutated in place.
//!
//! The co-authorship matrix is persisted in Matrix Market format, with the
//! node ordering saved alongside so the file can be mapped back to ids.

use super::Graph;
use citenet_common::errors::{AnalysisError, Result};
use citenet_common::types::NodeId;
use sprs::{CsMat, TriMat};
use std::path::Path;

/// CSR adjacency matrix plus the node ordering its indices refer to
#[derive(Debug, Clone)]
pub struct AdjacencyMatrix {
    ordering: Vec<NodeId>,
    matrix: CsMat<f64>,
}

impl AdjacencyMatrix {
    /// Build from a graph, rows and columns ordered by ascending node id.
    /// Row i holds the outgoing weights of `ordering[i]`, so the matrix of
    /// an undirected graph comes out symmetric.
    pub fn from_graph(graph: &Graph) -> Self {
        let ordering: Vec<NodeId> = graph.nodes().collect();
        let n = ordering.len();

        let mut triplets = TriMat::new((n, n));
        for (row, &id) in ordering.iter().enumerate() {
            for &(target, weight) in graph.successors(id) {
                let col = ordering
                    .binary_search(&target)
                    .expect("edge target is a graph node");
                triplets.add_triplet(row, col, f64::from(weight));
            }
        }

        Self {
            ordering,
            matrix: triplets.to_csr(),
        }
    }

    /// Node count
    pub fn n(&self) -> usize {
        self.ordering.len()
    }

    /// The ascending node ordering rows/columns are keyed on
    pub fn ordering(&self) -> &[NodeId] {
        &self.ordering
    }

    /// Matrix index of a node id
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.ordering.binary_search(&id).ok()
    }

    pub fn matrix(&self) -> &CsMat<f64> {
        &self.matrix
    }

    /// y = A x
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        let mut y = vec![0.0; self.n()];
        for (row, row_vec) in self.matrix.outer_iterator().enumerate() {
            let mut acc = 0.0;
            for (col, &val) in row_vec.iter() {
                acc += val * x[col];
            }
            y[row] = acc;
        }
        y
    }

    /// x = Aᵗ y
    pub fn apply_transpose(&self, y: &[f64]) -> Vec<f64> {
        let mut x = vec![0.0; self.n()];
        for (row, row_vec) in self.matrix.outer_iterator().enumerate() {
            for (col, &val) in row_vec.iter() {
                x[col] += val * y[row];
            }
        }
        x
    }

    /// Out-weight of every row; zero entries mark dangling nodes
    pub fn row_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.n()];
        for (row, row_vec) in self.matrix.outer_iterator().enumerate() {
            sums[row] = row_vec.iter().map(|(_, &val)| val).sum();
        }
        sums
    }

    /// Persist in Matrix Market format
    pub fn save_matrix_market<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        sprs::io::write_matrix_market(path, self.matrix.view()).map_err(|e| {
            AnalysisError::MatrixIo {
                message: format!("write failed: {e}"),
            }
        })
    }

    /// Load a Matrix Market file back, reattaching the persisted ordering
    pub fn load_matrix_market<P: AsRef<Path>>(path: P, ordering: Vec<NodeId>) -> Result<Self> {
        let triplets: TriMat<f64> =
            sprs::io::read_matrix_market(path).map_err(|e| AnalysisError::MatrixIo {
                message: format!("read failed: {e}"),
            })?;
        if triplets.rows() != ordering.len() || triplets.cols() != ordering.len() {
            return Err(AnalysisError::MatrixIo {
                message: format!(
                    "matrix is {}x{} but ordering has {} nodes",
                    triplets.rows(),
                    triplets.cols(),
                    ordering.len()
                ),
            });
        }
        Ok(Self {
            ordering,
            matrix: triplets.to_csr(),
        })
    }
}
