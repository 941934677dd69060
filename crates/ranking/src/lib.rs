//! ExpertRank ranking engine
//!
//! Ranks documents and authors of a bibliographic graph by topical
//! expertise. Four models share one synchronous fixed-point engine:
//! - Infinite random walk over authorships
//! - Full-graph random walk (adds citations and collaborations)
//! - Weighted full-graph random walk (declared edge weights)
//! - Two-node-type PageRank
//!
//! ```no_run
//! use expertrank_ranking::{
//!     rank, BibliographicGraph, ConvergenceSettings, ModelKind, RankingMethod,
//! };
//!
//! # fn main() -> expertrank_common::Result<()> {
//! let mut builder = BibliographicGraph::builder();
//! builder.authorship("d1", "a1").citation("d2", "d1");
//! let graph = builder.build()?;
//!
//! let method = RankingMethod::defaults(ModelKind::PageRank)?;
//! let outcome = rank(&graph, None, method, ConvergenceSettings::default())?;
//! println!("{:?}", outcome.top_authors(10));
//! # Ok(())
//! # }
//! ```

pub mod convergence;
pub mod engine;
pub mod graph;
pub mod logspace;
pub mod method;
pub mod models;
pub mod outcome;
pub mod scores;

pub use convergence::{Convergence, ConvergenceChecker};
pub use engine::{
    ConvergenceSettings, IterationObserver, NoopObserver, PropagationEngine, TracingObserver,
};
pub use graph::{BibliographicGraph, GraphBuilder, GraphRecord, GraphView, NodeId, Relation};
pub use method::{rank, RankingMethod};
pub use models::{Generation, ModelKind, PropagationModel};
pub use outcome::{RankedNode, RankingOutcome};
pub use scores::{RelevancePrior, ScoreVector};
