//! Propagation engine
//!
//! Drives any [`PropagationModel`] to a fixed point:
//! 1. Build iteration 0 with the model's initialization rule
//! 2. Compute every document, then every author, from the previous generation only
//! 3. Compare author generations; stop on convergence or at the iteration cap
//!
//! Only two generations are alive at any time. They swap roles after every
//! round, so memory stays at two vectors per node type regardless of the cap.

use crate::convergence::{Convergence, ConvergenceChecker};
use crate::graph::GraphView;
use crate::models::{Generation, PropagationModel};
use crate::outcome::RankingOutcome;
use expertrank_common::errors::{AppError, Result};
use expertrank_common::metrics::{self, RunTimer};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};
use validator::Validate;

/// Default convergence threshold on the aggregate author delta
pub const DEFAULT_EPSILON: f64 = 8e-8;

/// Default hard iteration cap
pub const DEFAULT_MAX_ITERATIONS: usize = 500;

/// Termination policy shared by every model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct ConvergenceSettings {
    #[validate(range(exclusive_min = 0.0))]
    epsilon: f64,

    /// At most `max_iterations - 1` update rounds are performed
    #[validate(range(min = 2))]
    max_iterations: usize,
}

impl Default for ConvergenceSettings {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl ConvergenceSettings {
    pub fn new(epsilon: f64, max_iterations: usize) -> Result<Self> {
        Self {
            epsilon,
            max_iterations,
        }
        .validated()
    }

    pub fn validated(self) -> Result<Self> {
        if !self.epsilon.is_finite() {
            return Err(AppError::invalid_field(
                "epsilon",
                format!("epsilon must be finite, got {}", self.epsilon),
            ));
        }
        self.validate()?;
        Ok(self)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}

/// Receives `(iteration, delta)` after every update round
pub trait IterationObserver {
    fn on_iteration(&mut self, iteration: usize, delta: f64);
}

impl<F: FnMut(usize, f64)> IterationObserver for F {
    fn on_iteration(&mut self, iteration: usize, delta: f64) {
        self(iteration, delta)
    }
}

/// Discards every round
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl IterationObserver for NoopObserver {
    fn on_iteration(&mut self, _iteration: usize, _delta: f64) {}
}

/// Emits one `trace` event per round
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver {
    model: &'static str,
}

impl TracingObserver {
    pub fn new(model: &'static str) -> Self {
        Self { model }
    }
}

impl IterationObserver for TracingObserver {
    fn on_iteration(&mut self, iteration: usize, delta: f64) {
        trace!(model = self.model, iteration, delta, "Propagation round");
    }
}

/// Generic fixed-point driver
#[derive(Debug, Clone, Copy)]
pub struct PropagationEngine {
    settings: ConvergenceSettings,
}

impl PropagationEngine {
    pub fn new(settings: ConvergenceSettings) -> Result<Self> {
        Ok(Self {
            settings: settings.validated()?,
        })
    }

    pub fn settings(&self) -> &ConvergenceSettings {
        &self.settings
    }

    /// Run `model` on `graph`, logging each round at trace level
    pub fn run<G, M>(&self, graph: &G, model: &M) -> Result<RankingOutcome>
    where
        G: GraphView + ?Sized,
        M: PropagationModel,
    {
        let mut observer = TracingObserver::new(model.kind().id());
        self.run_observed(graph, model, &mut observer)
    }

    /// Run `model` on `graph`, reporting every round to `observer`
    pub fn run_observed<G, M, O>(
        &self,
        graph: &G,
        model: &M,
        observer: &mut O,
    ) -> Result<RankingOutcome>
    where
        G: GraphView + ?Sized,
        M: PropagationModel,
        O: IterationObserver + ?Sized,
    {
        let kind = model.kind();
        let result = self.propagate(graph, model, observer);

        if let Err(err) = &result {
            let fault = match err {
                AppError::EdgeWeightNotFound { .. } => Some("edge_weight_not_found"),
                AppError::KeyUniverseMismatch { .. } => Some("key_universe_mismatch"),
                _ => None,
            };
            if let Some(fault) = fault {
                error!(model = kind.id(), error = %err, "Propagation aborted by graph fault");
                metrics::record_graph_fault(kind.id(), fault);
            }
        }

        result
    }

    fn propagate<G, M, O>(&self, graph: &G, model: &M, observer: &mut O) -> Result<RankingOutcome>
    where
        G: GraphView + ?Sized,
        M: PropagationModel,
        O: IterationObserver + ?Sized,
    {
        let kind = model.kind();
        let timer = RunTimer::start(kind.id());
        let checker = ConvergenceChecker::new(self.settings.epsilon());
        let last_round = self.settings.max_iterations() - 1;

        let mut previous = model.initialize(graph)?;
        let mut current = previous.clone();

        debug!(
            model = kind.id(),
            documents = graph.documents().len(),
            authors = graph.authors().len(),
            epsilon = checker.epsilon(),
            max_iterations = self.settings.max_iterations(),
            "Propagation initialized"
        );

        let mut iteration = 0;
        let convergence: Convergence = loop {
            iteration += 1;

            advance(graph, model, &previous, &mut current)?;
            let check = checker.check(&current.authors, &previous.authors)?;
            observer.on_iteration(iteration, check.delta);

            std::mem::swap(&mut previous, &mut current);

            if check.converged || iteration >= last_round {
                break check;
            }
        };

        timer.finish(iteration, convergence.converged);

        if convergence.converged {
            info!(
                model = kind.id(),
                iterations = iteration,
                delta = convergence.delta,
                "Propagation converged"
            );
        } else {
            warn!(
                model = kind.id(),
                iterations = iteration,
                delta = convergence.delta,
                epsilon = checker.epsilon(),
                "Iteration cap reached before convergence"
            );
        }

        Ok(RankingOutcome {
            model: kind,
            documents: previous.documents,
            authors: previous.authors,
            iterations: iteration,
            converged: convergence.converged,
            delta: convergence.delta,
        })
    }
}

/// One synchronous round: `next` is rebuilt from `previous` alone
fn advance<G, M>(graph: &G, model: &M, previous: &Generation, next: &mut Generation) -> Result<()>
where
    G: GraphView + ?Sized,
    M: PropagationModel,
{
    for document in graph.documents() {
        let score = model.update_document(graph, document, previous)?;
        next.documents.set(document, score);
    }
    for author in graph.authors() {
        let score = model.update_author(graph, author, previous)?;
        next.authors.set(author, score);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{BibliographicGraph, GraphBuilder, NodeId};
    use crate::models::{
        testing, BasicRandomWalk, FullRandomWalk, MixedWalkParams, PageRank, PageRankParams,
        RandomWalkParams,
    };
    use crate::scores::RelevancePrior;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn basic(prior: &RelevancePrior) -> BasicRandomWalk<'_> {
        BasicRandomWalk::new(RandomWalkParams::new(0.5).unwrap(), prior).unwrap()
    }

    fn random_graph(rng: &mut StdRng) -> (BibliographicGraph, RelevancePrior) {
        let documents = rng.gen_range(1..30);
        let authors = rng.gen_range(1..20);
        let mut builder = GraphBuilder::new();
        for d in 0..documents {
            builder.document(format!("d{d}"));
        }
        for a in 0..authors {
            builder.author(format!("a{a}"));
        }
        for _ in 0..rng.gen_range(0..60) {
            let d = rng.gen_range(0..documents);
            let a = rng.gen_range(0..authors);
            builder.authorship(format!("d{d}"), format!("a{a}"));
        }
        for _ in 0..rng.gen_range(0..60) {
            let from = rng.gen_range(0..documents);
            let to = rng.gen_range(0..documents);
            builder.citation(format!("d{from}"), format!("d{to}"));
        }
        for _ in 0..rng.gen_range(0..40) {
            let a = rng.gen_range(0..authors);
            let b = rng.gen_range(0..authors);
            builder.coauthors(format!("a{a}"), format!("a{b}"));
        }
        let prior = (0..documents)
            .map(|d| (format!("d{d}"), rng.gen::<f64>()))
            .collect();
        (builder.build().unwrap(), prior)
    }

    #[test]
    fn test_settings_validation() {
        assert!(ConvergenceSettings::new(8e-8, 500).is_ok());
        assert!(ConvergenceSettings::new(0.0, 500).is_err());
        assert!(ConvergenceSettings::new(-1e-6, 500).is_err());
        assert!(ConvergenceSettings::new(f64::NAN, 500).is_err());
        assert!(ConvergenceSettings::new(1e-6, 1).is_err());
        assert!(ConvergenceSettings::new(1e-6, 2).is_ok());

        let settings: ConvergenceSettings =
            serde_json::from_str(r#"{"epsilon": 0.0, "max_iterations": 10}"#).unwrap();
        assert!(PropagationEngine::new(settings).is_err());
    }

    #[test]
    fn test_two_pairs_basic_walk() {
        let (graph, prior) = testing::two_pairs();
        let engine = PropagationEngine::new(ConvergenceSettings::new(1e-6, 500).unwrap()).unwrap();

        let mut rounds: Vec<(usize, f64)> = Vec::new();
        let mut observer = |iteration: usize, delta: f64| rounds.push((iteration, delta));
        let outcome = engine.run_observed(&graph, &basic(&prior), &mut observer).unwrap();

        assert!(outcome.converged);
        assert!(outcome.delta < 1e-6);
        assert_eq!(rounds.len(), outcome.iterations);
        assert_eq!(rounds.first().map(|r| r.0), Some(1));

        // Aggregate delta never grows
        for pair in rounds.windows(2) {
            assert!(pair[1].1 <= pair[0].1 + 1e-12, "delta grew: {:?}", pair);
        }

        // Fixed point of pd = 0.5·prior + 0.5·pca, pca = 0.25 + 0.5·pd
        let golden = [("d1", 17.0 / 30.0), ("d2", 13.0 / 30.0)];
        for (id, value) in golden {
            assert!((outcome.documents.score_or_zero(id) - value).abs() < 1e-5, "{id}");
        }
        let golden = [("a1", 8.0 / 15.0), ("a2", 7.0 / 15.0)];
        for (id, value) in golden {
            assert!((outcome.authors.score_or_zero(id) - value).abs() < 1e-5, "{id}");
        }
    }

    #[test]
    fn test_higher_prior_author_leads_every_round() {
        let (graph, prior) = testing::two_pairs();
        let model = basic(&prior);

        for cap in 2..40 {
            let settings = ConvergenceSettings::new(1e-6, cap).unwrap();
            let engine = PropagationEngine::new(settings).unwrap();
            let outcome = engine.run(&graph, &model).unwrap();
            let a1 = outcome.authors.score_or_zero("a1");
            let a2 = outcome.authors.score_or_zero("a2");
            assert!(a1 > a2, "cap {cap}: a1 {a1} <= a2 {a2}");
        }
    }

    #[test]
    fn test_two_pairs_pagerank_is_symmetric() {
        let (graph, _) = testing::two_pairs();
        let model = PageRank::new(PageRankParams::new(0.85).unwrap()).unwrap();
        let engine = PropagationEngine::new(ConvergenceSettings::new(1e-6, 500).unwrap()).unwrap();

        let outcome = engine.run(&graph, &model).unwrap();

        assert!(outcome.converged);
        let d1 = outcome.documents.score_or_zero("d1");
        let d2 = outcome.documents.score_or_zero("d2");
        let a1 = outcome.authors.score_or_zero("a1");
        let a2 = outcome.authors.score_or_zero("a2");
        assert!((d1 - d2).abs() < 1e-12);
        assert!((a1 - a2).abs() < 1e-12);
        assert!((d1 - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_single_round_with_minimal_cap() {
        let (graph, prior) = testing::two_pairs();
        let engine = PropagationEngine::new(ConvergenceSettings::new(1e-6, 2).unwrap()).unwrap();

        let outcome = engine
            .run_observed(&graph, &basic(&prior), &mut NoopObserver)
            .unwrap();

        assert_eq!(outcome.iterations, 1);
        assert!(!outcome.converged);
        assert!((outcome.authors.score_or_zero("a1") - 0.55).abs() < 1e-12);
        assert!((outcome.documents.score_or_zero("d1") - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_rounds_read_previous_generation_only() {
        // An in-place sweep would give a1 = 0.4 after the first round
        let (graph, prior) = testing::two_pairs();
        let engine = PropagationEngine::new(ConvergenceSettings::new(1e-12, 3).unwrap()).unwrap();

        let outcome = engine.run(&graph, &basic(&prior)).unwrap();

        assert_eq!(outcome.iterations, 2);
        assert!((outcome.documents.score_or_zero("d1") - 0.575).abs() < 1e-12);
        assert!((outcome.authors.score_or_zero("a1") - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_hard_cap_is_never_exceeded() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..25 {
            let (graph, prior) = random_graph(&mut rng);
            let cap = rng.gen_range(2..12);
            let settings = ConvergenceSettings::new(f64::MIN_POSITIVE, cap).unwrap();
            let engine = PropagationEngine::new(settings).unwrap();
            let params = MixedWalkParams::new(0.1, 0.5, 0.25).unwrap();

            let mut rounds = 0;
            let mut count = |_: usize, _: f64| rounds += 1;
            let outcome = engine
                .run_observed(&graph, &FullRandomWalk::new(params, &prior).unwrap(), &mut count)
                .unwrap();

            assert!(outcome.iterations <= cap - 1);
            assert_eq!(outcome.iterations, rounds);
        }
    }

    #[test]
    fn test_key_universe_is_fixed() {
        let mut rng = StdRng::seed_from_u64(11);
        let (graph, _) = random_graph(&mut rng);
        let model = PageRank::new(PageRankParams::new(0.5).unwrap()).unwrap();
        let engine = PropagationEngine::new(ConvergenceSettings::new(1e-6, 50).unwrap()).unwrap();

        let outcome = engine.run(&graph, &model).unwrap();

        let documents: Vec<&NodeId> = outcome.documents.keys().collect();
        let authors: Vec<&NodeId> = outcome.authors.keys().collect();
        assert_eq!(documents, graph.documents().iter().collect::<Vec<_>>());
        assert_eq!(authors, graph.authors().iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_runs_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(3);
        let (graph, prior) = random_graph(&mut rng);
        let params = MixedWalkParams::new(0.1, 0.5, 0.25).unwrap();
        let engine = PropagationEngine::new(ConvergenceSettings::default()).unwrap();

        let first = engine.run(&graph, &FullRandomWalk::new(params, &prior).unwrap()).unwrap();
        let second = engine.run(&graph, &FullRandomWalk::new(params, &prior).unwrap()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_independent_runs_in_parallel() {
        let (graph, prior) = testing::small_library();
        let engine = PropagationEngine::new(ConvergenceSettings::default()).unwrap();

        let (walk, rank) = std::thread::scope(|scope| {
            let walk = scope.spawn(|| engine.run(&graph, &basic(&prior)));
            let rank = scope.spawn(|| {
                let model = PageRank::new(PageRankParams::new(0.5).unwrap()).unwrap();
                engine.run(&graph, &model)
            });
            (walk.join().unwrap(), rank.join().unwrap())
        });

        let model = PageRank::new(PageRankParams::new(0.5).unwrap()).unwrap();
        assert_eq!(walk.unwrap(), engine.run(&graph, &basic(&prior)).unwrap());
        assert_eq!(rank.unwrap(), engine.run(&graph, &model).unwrap());
    }
}
