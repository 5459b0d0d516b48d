//! Corpus snapshot loading and artifact writing
//!
//! All external data arrives as JSON tables written by the scraping,
//! disambiguation, and id-matching collaborators, and is loaded once per
//! run as an immutable in-memory snapshot. Outputs go back out the same
//! way: rank tables for reporting/plotting and the persisted adjacency
//! matrix ordering.

use citenet_common::config::SnapshotConfig;
use citenet_common::errors::{AnalysisError, Result};
use citenet_common::types::{ArticleAttributes, AttributeTable, NodeId, ResolvedEdge};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// One run's immutable input data
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub attributes: AttributeTable,
    pub references: Vec<ResolvedEdge>,
    pub citations: Vec<ResolvedEdge>,
}

impl Snapshot {
    /// Load every configured table. Paths that fail to read or parse are
    /// hard errors; a batch run with partial inputs produces misleading
    /// rankings.
    pub fn load(config: &SnapshotConfig) -> Result<Self> {
        let attributes = load_attributes(&config.attributes_path)?;
        let references = load_edges(&config.references_path)?;
        let citations = load_edges(&config.citations_path)?;
        info!(
            articles = attributes.len(),
            references = references.len(),
            citations = citations.len(),
            "Snapshot loaded"
        );
        Ok(Self {
            attributes,
            references,
            citations,
        })
    }

    /// References and citations stacked into one directed edge list, the
    /// input for the combined citation graph
    pub fn all_citation_edges(&self) -> Vec<ResolvedEdge> {
        let mut edges = self.references.clone();
        edges.extend(self.citations.iter().copied());
        edges
    }
}

fn load_attributes<P: AsRef<Path>>(path: P) -> Result<AttributeTable> {
    let raw = fs::read_to_string(&path).map_err(|e| AnalysisError::Snapshot {
        message: format!("attributes {}: {e}", path.as_ref().display()),
    })?;
    let records: BTreeMap<NodeId, ArticleAttributes> = serde_json::from_str(&raw)?;
    Ok(AttributeTable { records })
}

fn load_edges<P: AsRef<Path>>(path: P) -> Result<Vec<ResolvedEdge>> {
    let raw = fs::read_to_string(&path).map_err(|e| AnalysisError::Snapshot {
        message: format!("edges {}: {e}", path.as_ref().display()),
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// One row of a persisted rank table
#[derive(Debug, Clone, Serialize)]
pub struct RankRow {
    pub node: NodeId,
    pub score: f64,
}

/// Write a scored ranking as a JSON table for downstream reporting
pub fn write_rank_table<P: AsRef<Path>>(path: P, ranking: &[(NodeId, f64)]) -> Result<()> {
    let rows: Vec<RankRow> = ranking
        .iter()
        .map(|&(node, score)| RankRow { node, score })
        .collect();
    write_json(path, &rows)
}

/// Persist the node ordering of a saved adjacency matrix so the Matrix
/// Market file can be mapped back to ids
pub fn write_ordering<P: AsRef<Path>>(path: P, ordering: &[NodeId]) -> Result<()> {
    write_json(path, &ordering)
}

fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(&path, body).map_err(|e| AnalysisError::Snapshot {
        message: format!("write {}: {e}", path.as_ref().display()),
    })
}
