//! CiteNet Analysis Engine
//!
//! Batch analysis of a bibliographic corpus:
//! - Co-authorship and citation graph construction from collaborator tables
//! - PageRank and HITS (power iteration and eigen-decomposition) ranking
//! - Topic- and similarity-driven bounded subgraph queries
//!
//! The ambient graphs are built once per run from an immutable snapshot;
//! rankings and query subgraphs are ephemeral and recomputed per call.

pub mod graph;
pub mod query;
pub mod ranking;
pub mod snapshot;

// Re-export the working set
pub use graph::{AdjacencyMatrix, Graph, GraphStore};
pub use ranking::{hits_power_iteration, EigenSolver, HitsScores, PageRank, PageRankScores};
pub use snapshot::Snapshot;
