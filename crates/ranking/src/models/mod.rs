//! Propagation models
//!
//! Each model defines how one node's score at iteration `t` follows from the
//! complete generation `t - 1`. The engine owns the loop; models only do the
//! per-node arithmetic.
//!
//! - [`BasicRandomWalk`]: teleporting walk over authorships only
//! - [`FullRandomWalk`]: adds citation and collaboration channels
//! - [`WeightedRandomWalk`]: the full walk with declared edge weights
//! - [`PageRank`]: two-node-type PageRank, independent of any prior

mod basic;
mod channels;
mod full;
mod pagerank;
mod weighted;

pub use basic::BasicRandomWalk;
pub use channels::{TransitionWeights, UniformWeights};
pub use full::{FullRandomWalk, MixedRandomWalk};
pub use pagerank::PageRank;
pub use weighted::{DeclaredWeights, WeightedRandomWalk};

use crate::graph::GraphView;
use crate::scores::{RelevancePrior, ScoreVector};
use expertrank_common::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use validator::Validate;

/// Document and author scores of one iteration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    pub documents: ScoreVector,
    pub authors: ScoreVector,
}

/// Per-node update rule driven by [`crate::engine::PropagationEngine`]
pub trait PropagationModel {
    fn kind(&self) -> ModelKind;

    /// Iteration 0. Must cover exactly the graph's documents and authors.
    fn initialize<G: GraphView + ?Sized>(&self, graph: &G) -> Result<Generation>;

    /// Score of `document` at `t`, reading only generation `t - 1`
    fn update_document<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        document: &str,
        previous: &Generation,
    ) -> Result<f64>;

    /// Score of `author` at `t`, reading only generation `t - 1`
    fn update_author<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        author: &str,
        previous: &Generation,
    ) -> Result<f64>;
}

/// The four ranking models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "infiniterandom")]
    BasicRandomWalk,
    #[serde(rename = "infiniterandomfull")]
    FullRandomWalk,
    #[serde(rename = "infiniterandomweighted")]
    WeightedRandomWalk,
    #[serde(rename = "pagerank")]
    PageRank,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::BasicRandomWalk,
        ModelKind::FullRandomWalk,
        ModelKind::WeightedRandomWalk,
        ModelKind::PageRank,
    ];

    /// Stable id used in configuration, logs and metrics
    pub fn id(&self) -> &'static str {
        match self {
            ModelKind::BasicRandomWalk => "infiniterandom",
            ModelKind::FullRandomWalk => "infiniterandomfull",
            ModelKind::WeightedRandomWalk => "infiniterandomweighted",
            ModelKind::PageRank => "pagerank",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::BasicRandomWalk => "Infinite Random Walk",
            ModelKind::FullRandomWalk => "Infinite Random Walk - Full Graph",
            ModelKind::WeightedRandomWalk => "Infinite Random Walk - Weighted Full Graph",
            ModelKind::PageRank => "Page Rank",
        }
    }

    /// Whether the graph producer has to load citation edges
    pub fn needs_citations(&self) -> bool {
        !matches!(self, ModelKind::BasicRandomWalk)
    }

    /// Whether the graph producer has to load collaboration edges
    pub fn needs_collaborations(&self) -> bool {
        !matches!(self, ModelKind::BasicRandomWalk)
    }

    /// Whether the graph producer has to load authorship edges
    pub fn needs_publications(&self) -> bool {
        true
    }

    /// Whether a relevance prior must be supplied
    pub fn needs_prior(&self) -> bool {
        !matches!(self, ModelKind::PageRank)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ModelKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| AppError::UnknownMethod { id: s.to_string() })
    }
}

/// Range checks accept NaN, so finiteness is checked separately
fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AppError::invalid_field(field, format!("{field} must be finite, got {value}")))
    }
}

/// Teleport weight for [`BasicRandomWalk`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct RandomWalkParams {
    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    lambda: f64,
}

impl RandomWalkParams {
    pub fn new(lambda: f64) -> Result<Self> {
        Self { lambda }.validated()
    }

    pub fn validated(self) -> Result<Self> {
        ensure_finite("lambda", self.lambda)?;
        self.validate()?;
        Ok(self)
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }
}

/// Teleport and channel-mixing weights for the full and weighted walks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct MixedWalkParams {
    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    lambda: f64,

    /// Share of the citation channel in a document's propagated mass
    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    md: f64,

    /// Share of the collaboration channel in an author's propagated mass
    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    mca: f64,
}

impl MixedWalkParams {
    pub fn new(lambda: f64, md: f64, mca: f64) -> Result<Self> {
        Self { lambda, md, mca }.validated()
    }

    pub fn validated(self) -> Result<Self> {
        ensure_finite("lambda", self.lambda)?;
        ensure_finite("md", self.md)?;
        ensure_finite("mca", self.mca)?;
        self.validate()?;
        Ok(self)
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn md(&self) -> f64 {
        self.md
    }

    pub fn mca(&self) -> f64 {
        self.mca
    }
}

/// Damping factor for [`PageRank`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct PageRankParams {
    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    damping: f64,
}

impl PageRankParams {
    pub fn new(damping: f64) -> Result<Self> {
        Self { damping }.validated()
    }

    pub fn validated(self) -> Result<Self> {
        ensure_finite("damping", self.damping)?;
        self.validate()?;
        Ok(self)
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }
}

/// Iteration 0 for the prior-driven walks: documents carry their prior,
/// authors start at zero.
pub(crate) fn prior_generation<G: GraphView + ?Sized>(
    graph: &G,
    prior: &RelevancePrior,
) -> Result<Generation> {
    let mut documents = ScoreVector::new();
    for document in graph.documents() {
        let value = prior_of(prior, document)?;
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::InvalidPrior {
                document: document.clone(),
                value,
            });
        }
        documents.set(document, value);
    }

    let ignored = prior.len().saturating_sub(documents.len());
    if ignored > 0 {
        debug!(ignored, "Prior entries without a matching document ignored");
    }

    Ok(Generation {
        documents,
        authors: ScoreVector::filled(graph.authors(), 0.0),
    })
}

pub(crate) fn prior_of(prior: &RelevancePrior, document: &str) -> Result<f64> {
    prior.get(document).ok_or_else(|| AppError::MissingPrior {
        document: document.to_string(),
    })
}

/// Share of the collection written by `author`
pub(crate) fn authorship_teleport<G: GraphView + ?Sized>(graph: &G, author: &str) -> f64 {
    let total = graph.documents().len();
    if total == 0 {
        return 0.0;
    }
    graph.author_documents(author).len() as f64 / total as f64
}
