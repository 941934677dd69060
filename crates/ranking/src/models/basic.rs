//! Teleporting random walk over authorships

use super::channels::{author_channel, document_channel, UniformWeights};
use super::{
    authorship_teleport, prior_generation, prior_of, Generation, ModelKind, PropagationModel,
    RandomWalkParams,
};
use crate::graph::GraphView;
use crate::logspace::mix;
use crate::scores::RelevancePrior;
use expertrank_common::errors::Result;

/// Documents teleport to their prior; authors teleport in proportion to how
/// much of the collection they wrote. Propagated mass moves only along
/// authorships, split uniformly over each node's edges.
#[derive(Debug, Clone)]
pub struct BasicRandomWalk<'a> {
    params: RandomWalkParams,
    prior: &'a RelevancePrior,
}

impl<'a> BasicRandomWalk<'a> {
    pub fn new(params: RandomWalkParams, prior: &'a RelevancePrior) -> Result<Self> {
        Ok(Self {
            params: params.validated()?,
            prior,
        })
    }
}

impl PropagationModel for BasicRandomWalk<'_> {
    fn kind(&self) -> ModelKind {
        ModelKind::BasicRandomWalk
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
        let propagated = author_channel(graph, &UniformWeights, document, previous)?;
        Ok(mix(self.params.lambda(), teleport, propagated))
    }

    fn update_author<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        author: &str,
        previous: &Generation,
    ) -> Result<f64> {
        let teleport = authorship_teleport(graph, author);
        let propagated = document_channel(graph, &UniformWeights, author, previous)?;
        Ok(mix(self.params.lambda(), teleport, propagated))
    }
}
