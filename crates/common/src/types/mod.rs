//! Core corpus types shared across the pipeline
//!
//! Nodes are identified by the integer ids assigned upstream by the
//! disambiguation and id-matching collaborators. All semantic attributes
//! (titles, keywords) live in the attribute table and are referenced by id
//! only; graph and ranking code never carries them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Graph node identifier (author or article number)
pub type NodeId = u32;

/// Text attributes of one article, keyed by id in the attribute table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleAttributes {
    /// Article title
    pub title: Option<String>,

    /// Keyword string as scraped (free text, not tokenized)
    pub keywords: Option<String>,

    /// Display string of the author list
    pub authors: Option<String>,

    /// Canonical author ids for this article
    #[serde(default)]
    pub author_ids: Vec<NodeId>,
}

impl ArticleAttributes {
    /// Look up a searchable text field by name. Unknown or unset fields
    /// return None, which topic queries treat as a non-match.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => self.title.as_deref(),
            "keywords" => self.keywords.as_deref(),
            "authors" => self.authors.as_deref(),
            _ => None,
        }
    }
}

/// The node attribute table: one record per article, ordered by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeTable {
    pub records: BTreeMap<NodeId, ArticleAttributes>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, attrs: ArticleAttributes) {
        self.records.insert(id, attrs);
    }

    pub fn get(&self, id: NodeId) -> Option<&ArticleAttributes> {
        self.records.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &ArticleAttributes)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Per-article author id lists, in id order. This is the EdgeBuilder
    /// input shape.
    pub fn author_lists(&self) -> Vec<Vec<NodeId>> {
        self.records.values().map(|a| a.author_ids.clone()).collect()
    }
}

/// One resolved reference/citation pair produced by the id-matching
/// collaborator: `referring` cites `referred_to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEdge {
    pub referring: NodeId,
    pub referred_to: NodeId,
}

/// Canonical-name lookup owned by the disambiguation collaborator
pub trait AuthorResolver {
    /// Map a raw author name to its canonical id, if known
    fn canonical_id(&self, raw_name: &str) -> Option<NodeId>;
}

/// External-key lookup owned by the scraping collaborator. Keys are
/// normalized URL tails; out-of-corpus targets are simply unknown.
pub trait ReferenceResolver {
    /// Map a raw external reference key to an internal node id, if known
    fn resolve(&self, raw_ref: &str) -> Option<NodeId>;
}

/// Exact-match id index: external key <-> internal node id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdIndex {
    entries: BTreeMap<String, NodeId>,
}

impl IdIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, id: NodeId) {
        self.entries.insert(key.into(), id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReferenceResolver for IdIndex {
    fn resolve(&self, raw_ref: &str) -> Option<NodeId> {
        self.entries.get(raw_ref).copied()
    }
}
