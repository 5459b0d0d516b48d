//! Citation graph store
//!
//! Resolves raw external reference identifiers against the corpus id index
//! and holds the resulting directed citation graph. Citation data routinely
//! points at material outside the corpus, so unresolvable references are
//! dropped, never reported as errors.

use super::Graph;
use citenet_common::types::{NodeId, ReferenceResolver, ResolvedEdge};
use tracing::debug;

/// Directed citation graph plus its degree and ranking queries
#[derive(Debug, Clone)]
pub struct GraphStore {
    graph: Graph,
}

/// Map one raw external reference key to an internal node id.
/// `None` means the target is outside the corpus (dead link or unknown).
pub fn resolve_reference<R: ReferenceResolver>(raw_ref: &str, id_index: &R) -> Option<NodeId> {
    id_index.resolve(raw_ref)
}

impl GraphStore {
    /// Build from already-resolved (referring, referred_to) pairs
    pub fn from_resolved(pairs: &[ResolvedEdge]) -> Self {
        let mut graph = Graph::directed();
        for pair in pairs {
            // referring cites referred_to
            graph.add_edge(pair.referring, pair.referred_to, 1);
        }
        Self { graph }
    }

    /// Resolve raw (referring, referred_to) key pairs against the id index
    /// and build the citation graph from the pairs where both sides are in
    /// the corpus
    pub fn from_raw_pairs<R: ReferenceResolver>(
        raw_pairs: &[(String, String)],
        id_index: &R,
    ) -> Self {
        let resolved = directed_edges_from_resolved(raw_pairs, id_index);
        let dropped = raw_pairs.len() - resolved.len();
        if dropped > 0 {
            debug!(
                total = raw_pairs.len(),
                dropped, "Dropped unresolvable reference pairs"
            );
        }
        Self::from_resolved(&resolved)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Citation count of an article
    pub fn in_degree(&self, id: NodeId) -> usize {
        self.graph.in_degree(id)
    }

    /// Reference count of an article
    pub fn out_degree(&self, id: NodeId) -> usize {
        self.graph.out_degree(id)
    }

    /// Nodes ordered by citation count descending (ties broken by id).
    /// `drop_zeros` removes never-cited nodes from the ranking, which is
    /// what reporting wants when comparing against authority scores.
    pub fn citation_ranking(&self, drop_zeros: bool) -> Vec<(NodeId, usize)> {
        let mut ranking: Vec<(NodeId, usize)> = self
            .graph
            .nodes()
            .map(|id| (id, self.graph.in_degree(id)))
            .filter(|&(_, cits)| !drop_zeros || cits > 0)
            .collect();
        ranking.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranking
    }
}

/// Resolve raw key pairs to (citing -> cited) edges, dropping any pair with
/// an unresolvable side. The cited side is resolved first: references to
/// out-of-corpus material are common and skipping them early avoids
/// pointless lookups for the citing side.
pub fn directed_edges_from_resolved<R: ReferenceResolver>(
    raw_pairs: &[(String, String)],
    id_index: &R,
) -> Vec<ResolvedEdge> {
    let mut edges = Vec::new();
    for (referring_key, referred_key) in raw_pairs {
        let Some(referred_to) = resolve_reference(referred_key, id_index) else {
            continue;
        };
        let Some(referring) = resolve_reference(referring_key, id_index) else {
            continue;
        };
        edges.push(ResolvedEdge {
            referring,
            referred_to,
        });
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use citenet_common::types::IdIndex;

    fn index() -> IdIndex {
        let mut index = IdIndex::new();
        index.insert("a", 1);
        index.insert("b", 2);
        index.insert("c", 3);
        index
    }

    #[test]
    fn test_unresolvable_references_are_dropped() {
        let raw = vec![
            ("a".to_string(), "b".to_string()),
            ("a".to_string(), "dead-link".to_string()),
            ("unknown".to_string(), "c".to_string()),
        ];
        let edges = directed_edges_from_resolved(&raw, &index());

        assert_eq!(
            edges,
            vec![ResolvedEdge {
                referring: 1,
                referred_to: 2
            }]
        );
    }

    #[test]
    fn test_store_degrees() {
        // 1 cites 2, 3 cites 2
        let pairs = vec![
            ResolvedEdge { referring: 1, referred_to: 2 },
            ResolvedEdge { referring: 3, referred_to: 2 },
        ];
        let store = GraphStore::from_resolved(&pairs);

        assert_eq!(store.in_degree(2), 2);
        assert_eq!(store.out_degree(2), 0);
        assert_eq!(store.out_degree(1), 1);
    }

    #[test]
    fn test_citation_ranking_drop_zeros() {
        let pairs = vec![
            ResolvedEdge { referring: 1, referred_to: 2 },
            ResolvedEdge { referring: 3, referred_to: 2 },
            ResolvedEdge { referring: 1, referred_to: 3 },
        ];
        let store = GraphStore::from_resolved(&pairs);

        let full = store.citation_ranking(false);
        assert_eq!(full, vec![(2, 2), (3, 1), (1, 0)]);

        let cited_only = store.citation_ranking(true);
        assert_eq!(cited_only, vec![(2, 2), (3, 1)]);
    }
}
