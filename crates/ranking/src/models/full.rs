//! Random walk over the full graph: authorships, citations and collaborations

use super::channels::{
    author_channel, citation_channel, collaboration_channel, document_channel, TransitionWeights,
    UniformWeights,
};
use super::{
    authorship_teleport, prior_generation, prior_of, Generation, MixedWalkParams, ModelKind,
    PropagationModel,
};
use crate::graph::GraphView;
use crate::logspace::mix;
use crate::scores::RelevancePrior;
use expertrank_common::errors::Result;

/// Teleporting walk mixing two channels per node type.
///
/// Documents: `λ·prior + (1-λ)·[(1-md)·authors + md·citations]`.
/// Authors: `λ·written/total + (1-λ)·[(1-mca)·documents + mca·collaborators]`.
#[derive(Debug, Clone)]
pub struct MixedRandomWalk<'a, W> {
    kind: ModelKind,
    params: MixedWalkParams,
    prior: &'a RelevancePrior,
    weights: W,
}

/// Mixed walk with `1 / out-degree` transitions
pub type FullRandomWalk<'a> = MixedRandomWalk<'a, UniformWeights>;

impl<'a> FullRandomWalk<'a> {
    pub fn new(params: MixedWalkParams, prior: &'a RelevancePrior) -> Result<Self> {
        Self::with_weights(ModelKind::FullRandomWalk, params, prior, UniformWeights)
    }
}

impl<'a, W: TransitionWeights> MixedRandomWalk<'a, W> {
    pub(crate) fn with_weights(
        kind: ModelKind,
        params: MixedWalkParams,
        prior: &'a RelevancePrior,
        weights: W,
    ) -> Result<Self> {
        Ok(Self {
            kind,
            params: params.validated()?,
            prior,
            weights,
        })
    }
}

impl<W: TransitionWeights> PropagationModel for MixedRandomWalk<'_, W> {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn initialize<G: GraphView + ?Sized>(&self, graph: &G) -> Result<Generation> {
        prior_generation(graph, self.prior)
    }

    fn update_document<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        document: &str,
        previous: &Generation,
    ) -> Result<f64> {
        let teleport = prior_of(self.prior, document)?;
        let from_authors = author_channel(graph, &self.weights, document, previous)?;
        let from_citations = citation_channel(graph, &self.weights, document, previous)?;
        let propagated = mix(self.params.md(), from_citations, from_authors);
        Ok(mix(self.params.lambda(), teleport, propagated))
    }

    fn update_author<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        author: &str,
        previous: &Generation,
    ) -> Result<f64> {
        let teleport = authorship_teleport(graph, author);
        let from_documents = document_channel(graph, &self.weights, author, previous)?;
        let from_collaborators = collaboration_channel(graph, &self.weights, author, previous)?;
        let propagated = mix(self.params.mca(), from_collaborators, from_documents);
        Ok(mix(self.params.lambda(), teleport, propagated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::models::testing;
    use crate::scores::ScoreVector;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_initial_scores_are_the_prior() {
        let (graph, prior) = testing::small_library();
        let params = MixedWalkParams::new(0.1, 0.5, 0.25).unwrap();
        let model = FullRandomWalk::new(params, &prior).unwrap();
        let generation = model.initialize(&graph).unwrap();

        assert_eq!(model.kind(), ModelKind::FullRandomWalk);
        assert_eq!(generation.documents, prior);
        assert_eq!(generation.authors.total(), 0.0);
    }

    #[test]
    fn test_document_update_mixes_channels() {
        // d2 cites d1; d1 written by a1
        let mut builder = GraphBuilder::new();
        builder.citation("d2", "d1").authorship("d1", "a1");
        let graph = builder.build().unwrap();
        let prior: RelevancePrior = [("d1".to_string(), 0.5), ("d2".to_string(), 0.1)]
            .into_iter()
            .collect();
        let params = MixedWalkParams::new(0.2, 0.3, 0.4).unwrap();
        let model = FullRandomWalk::new(params, &prior).unwrap();

        let previous = Generation {
            documents: prior.clone(),
            authors: [("a1".to_string(), 0.8)].into_iter().collect::<ScoreVector>(),
        };

        // 0.2 * 0.5 + 0.8 * (0.7 * 0.8 + 0.3 * 0.1)
        let expected = 0.1 + 0.8 * (0.56 + 0.03);
        assert!(close(model.update_document(&graph, "d1", &previous).unwrap(), expected));
    }

    #[test]
    fn test_author_update_mixes_channels() {
        let mut builder = GraphBuilder::new();
        builder
            .authorship("d1", "a1")
            .authorship("d2", "a2")
            .coauthors("a1", "a2");
        let graph = builder.build().unwrap();
        let prior: RelevancePrior = [("d1".to_string(), 0.5), ("d2".to_string(), 0.5)]
            .into_iter()
            .collect();
        let params = MixedWalkParams::new(0.5, 0.5, 0.25).unwrap();
        let model = FullRandomWalk::new(params, &prior).unwrap();

        let previous = Generation {
            documents: [("d1".to_string(), 0.4), ("d2".to_string(), 0.2)].into_iter().collect(),
            authors: [("a1".to_string(), 0.1), ("a2".to_string(), 0.6)].into_iter().collect(),
        };

        // teleport 1/2, documents 0.4, collaborators 0.6
        let expected = 0.5 * 0.5 + 0.5 * (0.75 * 0.4 + 0.25 * 0.6);
        assert!(close(model.update_author(&graph, "a1", &previous).unwrap(), expected));
    }

    #[test]
    fn test_missing_channels_are_zero() {
        let (graph, prior) = testing::small_library();
        let params = MixedWalkParams::new(0.1, 0.5, 0.25).unwrap();
        let model = FullRandomWalk::new(params, &prior).unwrap();
        let start = model.initialize(&graph).unwrap();

        // d5: no authors, no citations
        let d5 = model.update_document(&graph, "d5", &start).unwrap();
        assert!(close(d5, 0.1 * 0.2));

        // a4: no documents, nobody collaborates with a4
        assert_eq!(model.update_author(&graph, "a4", &start).unwrap(), 0.0);
    }
}
