//! Model selection and the single ranking entry point

use crate::engine::{ConvergenceSettings, PropagationEngine};
use crate::graph::GraphView;
use crate::models::{
    BasicRandomWalk, FullRandomWalk, MixedWalkParams, ModelKind, PageRank, PageRankParams,
    RandomWalkParams, WeightedRandomWalk,
};
use crate::outcome::RankingOutcome;
use crate::scores::RelevancePrior;
use expertrank_common::config::RankingConfig;
use expertrank_common::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

const BASIC_LAMBDA: f64 = 0.5;
const MIXED_LAMBDA: f64 = 0.1;
const MIXED_MD: f64 = 0.5;
const MIXED_MCA: f64 = 0.25;
const PAGERANK_DAMPING: f64 = 0.5;

/// A model together with its validated parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum RankingMethod {
    #[serde(rename = "infiniterandom")]
    BasicRandomWalk(RandomWalkParams),
    #[serde(rename = "infiniterandomfull")]
    FullRandomWalk(MixedWalkParams),
    #[serde(rename = "infiniterandomweighted")]
    WeightedRandomWalk(MixedWalkParams),
    #[serde(rename = "pagerank")]
    PageRank(PageRankParams),
}

impl RankingMethod {
    /// `kind` with its stock parameters
    pub fn defaults(kind: ModelKind) -> Result<Self> {
        Ok(match kind {
            ModelKind::BasicRandomWalk => {
                RankingMethod::BasicRandomWalk(RandomWalkParams::new(BASIC_LAMBDA)?)
            }
            ModelKind::FullRandomWalk => RankingMethod::FullRandomWalk(mixed_defaults()?),
            ModelKind::WeightedRandomWalk => RankingMethod::WeightedRandomWalk(mixed_defaults()?),
            ModelKind::PageRank => {
                RankingMethod::PageRank(PageRankParams::new(PAGERANK_DAMPING)?)
            }
        })
    }

    /// Method named by `config.method`, stock parameters overridden where set
    pub fn from_config(config: &RankingConfig) -> Result<Self> {
        let kind: ModelKind = config.method.parse()?;
        Ok(match Self::defaults(kind)? {
            RankingMethod::BasicRandomWalk(params) => {
                let lambda = config.lambda.unwrap_or(params.lambda());
                RankingMethod::BasicRandomWalk(RandomWalkParams::new(lambda)?)
            }
            RankingMethod::FullRandomWalk(params) => {
                RankingMethod::FullRandomWalk(override_mixed(params, config)?)
            }
            RankingMethod::WeightedRandomWalk(params) => {
                RankingMethod::WeightedRandomWalk(override_mixed(params, config)?)
            }
            RankingMethod::PageRank(params) => {
                let damping = config.damping.unwrap_or(params.damping());
                RankingMethod::PageRank(PageRankParams::new(damping)?)
            }
        })
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            RankingMethod::BasicRandomWalk(_) => ModelKind::BasicRandomWalk,
            RankingMethod::FullRandomWalk(_) => ModelKind::FullRandomWalk,
            RankingMethod::WeightedRandomWalk(_) => ModelKind::WeightedRandomWalk,
            RankingMethod::PageRank(_) => ModelKind::PageRank,
        }
    }
}

fn mixed_defaults() -> Result<MixedWalkParams> {
    MixedWalkParams::new(MIXED_LAMBDA, MIXED_MD, MIXED_MCA)
}

fn override_mixed(params: MixedWalkParams, config: &RankingConfig) -> Result<MixedWalkParams> {
    MixedWalkParams::new(
        config.lambda.unwrap_or(params.lambda()),
        config.md.unwrap_or(params.md()),
        config.mca.unwrap_or(params.mca()),
    )
}

/// Rank the documents and authors of `graph` with `method`.
///
/// `prior` is required by every model except PageRank, which ignores it.
pub fn rank<G>(
    graph: &G,
    prior: Option<&RelevancePrior>,
    method: RankingMethod,
    settings: ConvergenceSettings,
) -> Result<RankingOutcome>
where
    G: GraphView + ?Sized,
{
    let engine = PropagationEngine::new(settings)?;
    let kind = method.kind();

    info!(
        model = kind.id(),
        documents = graph.documents().len(),
        authors = graph.authors().len(),
        "Ranking started"
    );

    let required_prior = || {
        prior.ok_or_else(|| AppError::MissingField {
            field: "relevance_prior".to_string(),
        })
    };

    match method {
        RankingMethod::BasicRandomWalk(params) => {
            engine.run(graph, &BasicRandomWalk::new(params, required_prior()?)?)
        }
        RankingMethod::FullRandomWalk(params) => {
            engine.run(graph, &FullRandomWalk::new(params, required_prior()?)?)
        }
        RankingMethod::WeightedRandomWalk(params) => {
            engine.run(graph, &WeightedRandomWalk::new(params, required_prior()?)?)
        }
        RankingMethod::PageRank(params) => engine.run(graph, &PageRank::new(params)?),
    }
}
