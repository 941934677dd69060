//! Propagation channels shared by the models
//!
//! A channel sums `score_prev(neighbor) · w(neighbor -> node)` over one kind
//! of incoming relation. How `w` is obtained is the only thing that differs
//! between the uniform and the weighted walks.

use super::Generation;
use crate::graph::{GraphView, Relation};
use crate::logspace::{product, uniform_share};
use expertrank_common::errors::Result;

/// Source of transition weights `w(source -> target)` under a relation
pub trait TransitionWeights {
    fn weight<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        relation: Relation,
        source: &str,
        target: &str,
    ) -> Result<f64>;
}

/// `1 / out-degree(source, relation)`, whatever weights the graph declares
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformWeights;

impl TransitionWeights for UniformWeights {
    fn weight<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        relation: Relation,
        source: &str,
        _target: &str,
    ) -> Result<f64> {
        Ok(uniform_share(graph.out_degree(source, relation)))
    }
}

/// Mass a document receives from its authors
pub(crate) fn author_channel<G, W>(
    graph: &G,
    weights: &W,
    document: &str,
    previous: &Generation,
) -> Result<f64>
where
    G: GraphView + ?Sized,
    W: TransitionWeights,
{
    let mut total = 0.0;
    for edge in graph.document_authors(document) {
        let author = edge.target.as_str();
        let w = weights.weight(graph, Relation::Authored, author, document)?;
        total += product(previous.authors.score_or_zero(author), w);
    }
    Ok(total)
}

/// Mass an author receives from the documents they wrote
pub(crate) fn document_channel<G, W>(
    graph: &G,
    weights: &W,
    author: &str,
    previous: &Generation,
) -> Result<f64>
where
    G: GraphView + ?Sized,
    W: TransitionWeights,
{
    let mut total = 0.0;
    for edge in graph.author_documents(author) {
        let document = edge.target.as_str();
        let w = weights.weight(graph, Relation::AuthoredBy, document, author)?;
        total += product(previous.documents.score_or_zero(document), w);
    }
    Ok(total)
}

/// Mass a document receives from the documents citing it
pub(crate) fn citation_channel<G, W>(
    graph: &G,
    weights: &W,
    document: &str,
    previous: &Generation,
) -> Result<f64>
where
    G: GraphView + ?Sized,
    W: TransitionWeights,
{
    let mut total = 0.0;
    for citing in graph.citing_documents(document) {
        let w = weights.weight(graph, Relation::Cites, citing, document)?;
        total += product(previous.documents.score_or_zero(citing), w);
    }
    Ok(total)
}

/// Mass an author receives from collaborators pointing at them
pub(crate) fn collaboration_channel<G, W>(
    graph: &G,
    weights: &W,
    author: &str,
    previous: &Generation,
) -> Result<f64>
where
    G: GraphView + ?Sized,
    W: TransitionWeights,
{
    let mut total = 0.0;
    for collaborator in graph.incoming_collaborators(author) {
        let w = weights.weight(graph, Relation::Collaborates, collaborator, author)?;
        total += product(previous.authors.score_or_zero(collaborator), w);
    }
    Ok(total)
}
