//! In-memory bibliographic graph
//!
//! Documents, authors and the three typed relations between them, built once
//! per query topic and read-only afterwards.

use super::{GraphView, NodeId, Relation, WeightedEdge};
use expertrank_common::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serialized form of a graph, as handed over by the graph producer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphRecord {
    /// Documents without any edge still need to be listed here
    #[serde(default)]
    pub documents: Vec<NodeId>,

    #[serde(default)]
    pub authors: Vec<NodeId>,

    #[serde(default)]
    pub authorships: Vec<AuthorshipRecord>,

    #[serde(default)]
    pub citations: Vec<CitationRecord>,

    #[serde(default)]
    pub collaborations: Vec<CollaborationRecord>,
}

/// Document written by author
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorshipRecord {
    pub document: NodeId,
    pub author: NodeId,

    /// Document -> author weight (default: 1 / number of authors of the document)
    #[serde(default)]
    pub weight: Option<f64>,

    /// Author -> document weight (default: 1 / number of documents of the author)
    #[serde(default)]
    pub reverse_weight: Option<f64>,
}

/// Citing document cites cited document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationRecord {
    pub citing: NodeId,
    pub cited: NodeId,

    /// Default: 1 / out-degree of the citing document
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Directed collaboration edge from `author` to `co_author`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborationRecord {
    pub author: NodeId,
    pub co_author: NodeId,

    /// Default: 1 / collaboration out-degree of `author`
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Edge waiting for its default weight
struct PendingEdge {
    source: NodeId,
    target: NodeId,
    weight: Option<f64>,
}

/// Collects nodes and edges, then freezes them into a [`BibliographicGraph`]
#[derive(Default)]
pub struct GraphBuilder {
    documents: BTreeSet<NodeId>,
    authors: BTreeSet<NodeId>,
    authored_by: Vec<PendingEdge>,
    authored: Vec<PendingEdge>,
    citations: Vec<PendingEdge>,
    collaborations: Vec<PendingEdge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document with no edges (yet)
    pub fn document(&mut self, id: impl Into<NodeId>) -> &mut Self {
        self.documents.insert(id.into());
        self
    }

    /// Register an author with no edges (yet)
    pub fn author(&mut self, id: impl Into<NodeId>) -> &mut Self {
        self.authors.insert(id.into());
        self
    }

    /// Authorship with uniform weights in both directions
    pub fn authorship(
        &mut self,
        document: impl Into<NodeId>,
        author: impl Into<NodeId>,
    ) -> &mut Self {
        self.push_authorship(document.into(), author.into(), None, None)
    }

    /// Authorship with explicit document -> author and author -> document weights
    pub fn weighted_authorship(
        &mut self,
        document: impl Into<NodeId>,
        author: impl Into<NodeId>,
        to_author: f64,
        to_document: f64,
    ) -> &mut Self {
        self.push_authorship(document.into(), author.into(), Some(to_author), Some(to_document))
    }

    pub fn citation(&mut self, citing: impl Into<NodeId>, cited: impl Into<NodeId>) -> &mut Self {
        self.push_citation(citing.into(), cited.into(), None)
    }

    pub fn weighted_citation(
        &mut self,
        citing: impl Into<NodeId>,
        cited: impl Into<NodeId>,
        weight: f64,
    ) -> &mut Self {
        self.push_citation(citing.into(), cited.into(), Some(weight))
    }

    /// Directed collaboration edge `author -> co_author`
    pub fn collaboration(
        &mut self,
        author: impl Into<NodeId>,
        co_author: impl Into<NodeId>,
    ) -> &mut Self {
        self.push_collaboration(author.into(), co_author.into(), None)
    }

    pub fn weighted_collaboration(
        &mut self,
        author: impl Into<NodeId>,
        co_author: impl Into<NodeId>,
        weight: f64,
    ) -> &mut Self {
        self.push_collaboration(author.into(), co_author.into(), Some(weight))
    }

    /// Collaboration in both directions with uniform weights
    pub fn coauthors(&mut self, first: impl Into<NodeId>, second: impl Into<NodeId>) -> &mut Self {
        let (first, second) = (first.into(), second.into());
        self.push_collaboration(first.clone(), second.clone(), None);
        self.push_collaboration(second, first, None)
    }

    fn push_authorship(
        &mut self,
        document: NodeId,
        author: NodeId,
        to_author: Option<f64>,
        to_document: Option<f64>,
    ) -> &mut Self {
        self.documents.insert(document.clone());
        self.authors.insert(author.clone());
        self.authored.push(PendingEdge {
            source: author.clone(),
            target: document.clone(),
            weight: to_document,
        });
        self.authored_by.push(PendingEdge {
            source: document,
            target: author,
            weight: to_author,
        });
        self
    }

    fn push_citation(&mut self, citing: NodeId, cited: NodeId, weight: Option<f64>) -> &mut Self {
        self.documents.insert(citing.clone());
        self.documents.insert(cited.clone());
        self.citations.push(PendingEdge {
            source: citing,
            target: cited,
            weight,
        });
        self
    }

    fn push_collaboration(
        &mut self,
        author: NodeId,
        co_author: NodeId,
        weight: Option<f64>,
    ) -> &mut Self {
        self.authors.insert(author.clone());
        self.authors.insert(co_author.clone());
        self.collaborations.push(PendingEdge {
            source: author,
            target: co_author,
            weight,
        });
        self
    }

    /// Validate weights, assign uniform defaults and freeze the graph
    pub fn build(self) -> Result<BibliographicGraph> {
        let document_authors = finish_edges(Relation::AuthoredBy, self.authored_by)?;
        let author_documents = finish_edges(Relation::Authored, self.authored)?;
        let cited = finish_edges(Relation::Cites, self.citations)?;
        let collaborators = finish_edges(Relation::Collaborates, self.collaborations)?;

        let citing = invert(&cited);
        let incoming_collaborators = invert(&collaborators);

        let weights = HashMap::from([
            (Relation::AuthoredBy, index_weights(&document_authors)),
            (Relation::Authored, index_weights(&author_documents)),
            (Relation::Cites, index_weights(&cited)),
            (Relation::Collaborates, index_weights(&collaborators)),
        ]);

        let graph = BibliographicGraph {
            documents: self.documents.into_iter().collect(),
            authors: self.authors.into_iter().collect(),
            document_authors,
            author_documents,
            cited,
            citing,
            collaborators,
            incoming_collaborators,
            weights,
        };

        debug!(
            documents = graph.documents.len(),
            authors = graph.authors.len(),
            "Bibliographic graph built"
        );

        Ok(graph)
    }
}

/// Group edges by source, dropping duplicates and filling in `1 / out-degree`
fn finish_edges(
    relation: Relation,
    pending: Vec<PendingEdge>,
) -> Result<HashMap<NodeId, Vec<WeightedEdge>>> {
    let mut seen: HashSet<(NodeId, NodeId)> = HashSet::with_capacity(pending.len());
    let mut grouped: HashMap<NodeId, Vec<(NodeId, Option<f64>)>> = HashMap::new();
    let mut duplicates = 0usize;

    for edge in pending {
        if let Some(weight) = edge.weight {
            if !weight.is_finite() || weight < 0.0 {
                return Err(AppError::invalid_field(
                    "weight",
                    format!(
                        "{} edge {} -> {} has weight {}, expected a finite nonnegative value",
                        relation, edge.source, edge.target, weight
                    ),
                ));
            }
        }

        if !seen.insert((edge.source.clone(), edge.target.clone())) {
            duplicates += 1;
            continue;
        }

        grouped
            .entry(edge.source)
            .or_default()
            .push((edge.target, edge.weight));
    }

    if duplicates > 0 {
        debug!(relation = %relation, duplicates, "Dropped duplicate edges");
    }

    Ok(grouped
        .into_iter()
        .map(|(source, edges)| {
            let uniform = 1.0 / edges.len() as f64;
            let edges = edges
                .into_iter()
                .map(|(target, weight)| WeightedEdge {
                    target,
                    weight: weight.unwrap_or(uniform),
                })
                .collect();
            (source, edges)
        })
        .collect())
}

/// Reverse adjacency, sorted so that summation order is reproducible
fn invert(outgoing: &HashMap<NodeId, Vec<WeightedEdge>>) -> HashMap<NodeId, Vec<NodeId>> {
    let mut incoming: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for (source, edges) in outgoing {
        for edge in edges {
            incoming
                .entry(edge.target.clone())
                .or_default()
                .push(source.clone());
        }
    }
    for sources in incoming.values_mut() {
        sources.sort_unstable();
    }
    incoming
}

/// source -> target -> weight, for constant-time lookups under one relation
type WeightIndex = HashMap<NodeId, HashMap<NodeId, f64>>;

fn index_weights(outgoing: &HashMap<NodeId, Vec<WeightedEdge>>) -> WeightIndex {
    outgoing
        .iter()
        .map(|(source, edges)| {
            let targets = edges
                .iter()
                .map(|edge| (edge.target.clone(), edge.weight))
                .collect();
            (source.clone(), targets)
        })
        .collect()
}

/// In-memory document/author graph
#[derive(Debug, Clone)]
pub struct BibliographicGraph {
    /// Sorted document ids
    documents: Vec<NodeId>,

    /// Sorted author ids
    authors: Vec<NodeId>,

    /// document -> its authors
    document_authors: HashMap<NodeId, Vec<WeightedEdge>>,

    /// author -> documents written
    author_documents: HashMap<NodeId, Vec<WeightedEdge>>,

    /// document -> documents it cites
    cited: HashMap<NodeId, Vec<WeightedEdge>>,

    /// document -> documents citing it
    citing: HashMap<NodeId, Vec<NodeId>>,

    /// author -> collaborators
    collaborators: HashMap<NodeId, Vec<WeightedEdge>>,

    /// author -> authors collaborating with it
    incoming_collaborators: HashMap<NodeId, Vec<NodeId>>,

    /// Declared weights per relation
    weights: HashMap<Relation, WeightIndex>,
}

impl BibliographicGraph {
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    /// Build from the serialized graph description
    pub fn from_record(record: GraphRecord) -> Result<Self> {
        let mut builder = GraphBuilder::new();

        for document in record.documents {
            builder.document(document);
        }
        for author in record.authors {
            builder.author(author);
        }
        for a in record.authorships {
            builder.push_authorship(a.document, a.author, a.weight, a.reverse_weight);
        }
        for c in record.citations {
            builder.push_citation(c.citing, c.cited, c.weight);
        }
        for c in record.collaborations {
            builder.push_collaboration(c.author, c.co_author, c.weight);
        }

        builder.build()
    }

    /// Build from a JSON [`GraphRecord`]
    pub fn from_json(raw: &str) -> Result<Self> {
        let record: GraphRecord = serde_json::from_str(raw)?;
        Self::from_record(record)
    }

    /// Read and build a JSON [`GraphRecord`] file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    /// Incoming citation count
    pub fn citation_count(&self, document: &str) -> usize {
        self.citing_documents(document).len()
    }
}

impl GraphView for BibliographicGraph {
    fn documents(&self) -> &[NodeId] {
        &self.documents
    }

    fn authors(&self) -> &[NodeId] {
        &self.authors
    }

    fn document_authors(&self, document: &str) -> &[WeightedEdge] {
        self.document_authors.get(document).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn author_documents(&self, author: &str) -> &[WeightedEdge] {
        self.author_documents.get(author).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn cited_documents(&self, document: &str) -> &[WeightedEdge] {
        self.cited.get(document).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn citing_documents(&self, document: &str) -> &[NodeId] {
        self.citing.get(document).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn collaborators(&self, author: &str) -> &[WeightedEdge] {
        self.collaborators.get(author).map(|v| v.as_slice()).unwrap_or(&[])
    }

    fn incoming_collaborators(&self, author: &str) -> &[NodeId] {
        self.incoming_collaborators
            .get(author)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    fn edge_weight(&self, relation: Relation, source: &str, target: &str) -> Option<f64> {
        self.weights.get(&relation)?.get(source)?.get(target).copied()
    }
}
