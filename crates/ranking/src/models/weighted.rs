//! Full-graph random walk driven by declared edge weights

use super::channels::TransitionWeights;
use super::full::MixedRandomWalk;
use super::{MixedWalkParams, ModelKind};
use crate::graph::{GraphView, Relation};
use crate::scores::RelevancePrior;
use expertrank_common::errors::{AppError, Result};

/// Weights as declared on the graph's edges.
///
/// A neighbor listed in the adjacency index without a resolvable weight means
/// the graph was built inconsistently. That is a hard error: substituting
/// zero would silently skew every score downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredWeights;

impl TransitionWeights for DeclaredWeights {
    fn weight<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        relation: Relation,
        source: &str,
        target: &str,
    ) -> Result<f64> {
        graph
            .edge_weight(relation, source, target)
            .ok_or_else(|| AppError::EdgeWeightNotFound {
                relation: relation.to_string(),
                origin: source.to_string(),
                target: target.to_string(),
            })
    }
}

/// Mixed walk with per-edge transition weights
pub type WeightedRandomWalk<'a> = MixedRandomWalk<'a, DeclaredWeights>;

impl<'a> WeightedRandomWalk<'a> {
    pub fn new(params: MixedWalkParams, prior: &'a RelevancePrior) -> Result<Self> {
        Self::with_weights(ModelKind::WeightedRandomWalk, params, prior, DeclaredWeights)
    }
}
