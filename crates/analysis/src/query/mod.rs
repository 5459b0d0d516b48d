//! Exploratory subgraph queries
//!
//! A query picks a root node set, either by keyword match over the
//! attribute table or by 1-hop similarity around seed articles, then
//! expands the roots into a bounded neighborhood and cuts the induced
//! subgraph out of the ambient graph. The subgraph is what the ranking
//! engines score for focused questions like "who are the authorities on
//! asymmetric information".

use crate::graph::Graph;
use citenet_common::errors::{AnalysisError, Result};
use citenet_common::types::{AttributeTable, NodeId};
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

/// How per-field topic results are combined across searched fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombinePolicy {
    /// A node matching in any field is a root
    #[default]
    Union,
    /// A node must match in every field
    Intersect,
}

impl std::str::FromStr for CombinePolicy {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "union" => Ok(CombinePolicy::Union),
            "intersect" | "inter" => Ok(CombinePolicy::Intersect),
            other => Err(AnalysisError::InvalidParameter {
                name: "combine".into(),
                message: format!("expected \"union\" or \"intersect\", got {other:?}"),
            }),
        }
    }
}

/// Root nodes for a topic query.
///
/// Per field: a node matches when its field value contains every keyword
/// as a case-sensitive substring (AND across keywords); a missing or
/// unknown field never matches. Field-level sets are then combined by the
/// policy.
pub fn topic_roots(
    attrs: &AttributeTable,
    keywords: &[String],
    search_fields: &[String],
    how: CombinePolicy,
) -> BTreeSet<NodeId> {
    let mut per_field: Vec<BTreeSet<NodeId>> = Vec::with_capacity(search_fields.len());
    for field in search_fields {
        let matches: BTreeSet<NodeId> = attrs
            .iter()
            .filter(|(_, record)| {
                record
                    .text_field(field)
                    .map(|text| keywords.iter().all(|kw| text.contains(kw.as_str())))
                    .unwrap_or(false)
            })
            .map(|(&id, _)| id)
            .collect();
        per_field.push(matches);
    }

    let mut fields = per_field.into_iter();
    let Some(first) = fields.next() else {
        return BTreeSet::new();
    };
    match how {
        CombinePolicy::Union => fields.fold(first, |acc, s| acc.union(&s).copied().collect()),
        CombinePolicy::Intersect => {
            fields.fold(first, |acc, s| acc.intersection(&s).copied().collect())
        }
    }
}

/// Root nodes for a similarity query: every direct predecessor and
/// successor of every seed, deduplicated. Seeds absent from the graph
/// contribute nothing.
pub fn similarity_roots(seeds: &[NodeId], graph: &Graph) -> BTreeSet<NodeId> {
    let mut roots = BTreeSet::new();
    for &seed in seeds {
        for &(succ, _) in graph.successors(seed) {
            roots.insert(succ);
        }
        for &(pred, _) in graph.predecessors(seed) {
            roots.insert(pred);
        }
    }
    roots
}

/// Expand roots one step outward: per root still present in the ambient
/// graph, all successors plus at most `d` predecessors. A root with more
/// than `d` predecessors gets a uniform sample without replacement, a
/// deliberate bound on blow-up at high-in-degree nodes. The RNG is
/// injected so tests and batch runs can pin the sample.
pub fn expand_roots<R: Rng>(
    roots: &BTreeSet<NodeId>,
    graph: &Graph,
    d: usize,
    rng: &mut R,
) -> BTreeSet<NodeId> {
    let mut expanded = BTreeSet::new();
    for &root in roots {
        if !graph.contains(root) {
            continue;
        }
        for &(succ, _) in graph.successors(root) {
            expanded.insert(succ);
        }
        let preds = graph.predecessors(root);
        if preds.len() >= d {
            for idx in rand::seq::index::sample(rng, preds.len(), d) {
                expanded.insert(preds[idx].0);
            }
        } else {
            for &(pred, _) in preds {
                expanded.insert(pred);
            }
        }
    }
    expanded
}

/// Expanded subgraph for a topic query
pub fn topic_query_subgraph<R: Rng>(
    graph: &Graph,
    attrs: &AttributeTable,
    keywords: &[String],
    search_fields: &[String],
    how: CombinePolicy,
    d: usize,
    rng: &mut R,
) -> Graph {
    let roots = topic_roots(attrs, keywords, search_fields, how);
    debug!(keywords = ?keywords, roots = roots.len(), "Topic query roots");
    induced_from_roots(graph, roots, d, rng)
}

/// Expanded subgraph for a similarity query
pub fn similarity_query_subgraph<R: Rng>(
    graph: &Graph,
    seeds: &[NodeId],
    d: usize,
    rng: &mut R,
) -> Graph {
    let roots = similarity_roots(seeds, graph);
    debug!(seeds = ?seeds, roots = roots.len(), "Similarity query roots");
    induced_from_roots(graph, roots, d, rng)
}

/// Induced subgraph over roots ∪ expansion, restricted to nodes that
/// exist in the ambient graph. Stale roots are dropped silently.
fn induced_from_roots<R: Rng>(
    graph: &Graph,
    roots: BTreeSet<NodeId>,
    d: usize,
    rng: &mut R,
) -> Graph {
    let mut keep = expand_roots(&roots, graph, d, rng);
    keep.extend(roots);
    graph.induced_subgraph(&keep)
}
