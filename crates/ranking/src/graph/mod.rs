//! Bibliographic graph access
//!
//! The propagation models only ever read the graph through [`GraphView`].
//! [`BibliographicGraph`] is the in-memory implementation used by the
//! `rank` binary and the tests.

mod bibliographic;

pub use bibliographic::{
    AuthorshipRecord, BibliographicGraph, CitationRecord, CollaborationRecord, GraphBuilder,
    GraphRecord,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifier for documents and authors
pub type NodeId = String;

/// Typed, directed relation between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Author -> document they wrote
    Authored,
    /// Document -> one of its authors
    AuthoredBy,
    /// Citing document -> cited document
    Cites,
    /// Author -> collaborator
    Collaborates,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Authored => "authored",
            Relation::AuthoredBy => "authored_by",
            Relation::Cites => "cites",
            Relation::Collaborates => "collaborates",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing edge with its declared transition weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge {
    /// Node at the head of the edge
    pub target: NodeId,

    /// Transition weight from the edge's source to `target`
    pub weight: f64,
}

/// Read-only view over the document/author graph.
///
/// Absent adjacency entries are empty slices, never errors. Implementations
/// must be consistent: every id in an incoming list has a matching outgoing
/// edge at its source.
pub trait GraphView {
    /// All document ids, in a stable order
    fn documents(&self) -> &[NodeId];

    /// All author ids, in a stable order
    fn authors(&self) -> &[NodeId];

    /// Authors of `document` (document -> author weights)
    fn document_authors(&self, document: &str) -> &[WeightedEdge];

    /// Documents written by `author` (author -> document weights)
    fn author_documents(&self, author: &str) -> &[WeightedEdge];

    /// Documents cited by `document`
    fn cited_documents(&self, document: &str) -> &[WeightedEdge];

    /// Documents citing `document`
    fn citing_documents(&self, document: &str) -> &[NodeId];

    /// Collaborators `author` points at
    fn collaborators(&self, author: &str) -> &[WeightedEdge];

    /// Authors pointing at `author` through a collaboration
    fn incoming_collaborators(&self, author: &str) -> &[NodeId];

    /// Outgoing edges of `node` under `relation`
    fn outgoing(&self, node: &str, relation: Relation) -> &[WeightedEdge] {
        match relation {
            Relation::Authored => self.author_documents(node),
            Relation::AuthoredBy => self.document_authors(node),
            Relation::Cites => self.cited_documents(node),
            Relation::Collaborates => self.collaborators(node),
        }
    }

    /// Out-degree of `node` under `relation`
    fn out_degree(&self, node: &str, relation: Relation) -> usize {
        self.outgoing(node, relation).len()
    }

    /// Declared weight of the `source -> target` edge, if one is recorded
    fn edge_weight(&self, relation: Relation, source: &str, target: &str) -> Option<f64> {
        self.outgoing(source, relation)
            .iter()
            .find(|edge| edge.target == target)
            .map(|edge| edge.weight)
    }
}
