//! ExpertRank command-line ranker
//!
//! Reads a bibliographic graph (and a relevance prior when the model needs
//! one) from JSON, runs the configured model and prints the top documents
//! and authors as JSON on stdout.
//!
//! Usage: `rank [GRAPH_PATH [PRIOR_PATH]]`. Paths default to the
//! `input.*` configuration keys.

use anyhow::Context;
use expertrank_common::{config::AppConfig, metrics, VERSION};
use expertrank_ranking::{
    rank, BibliographicGraph, ConvergenceSettings, RankedNode, RankingMethod, RelevancePrior,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Report<'a> {
    model: &'a str,
    model_name: &'a str,
    iterations: usize,
    converged: bool,
    delta: f64,
    documents: Vec<RankedNode>,
    authors: Vec<RankedNode>,
}

fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    dotenvy::dotenv().ok();
    let config = AppConfig::load().context("Failed to load configuration")?;

    // 2. Setup logging
    let filter = EnvFilter::try_new(&config.observability.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if config.observability.json_logging {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    metrics::register_metrics();

    info!(
        service = %config.observability.service_name,
        "Starting ExpertRank ranker v{}", VERSION
    );

    // 3. Resolve method and termination policy
    let method = RankingMethod::from_config(&config.ranking)?;
    let settings =
        ConvergenceSettings::new(config.ranking.epsilon, config.ranking.max_iterations)?;

    // 4. Load inputs
    let mut args = std::env::args().skip(1);
    let graph_path = args.next().unwrap_or_else(|| config.input.graph_path.clone());
    let prior_path = args.next().or_else(|| config.input.prior_path.clone());

    let graph = BibliographicGraph::from_path(&graph_path)
        .with_context(|| format!("Failed to load graph from {graph_path}"))?;

    let prior: Option<RelevancePrior> = match (&prior_path, method.kind().needs_prior()) {
        (Some(path), true) => Some(
            RelevancePrior::from_path(path)
                .with_context(|| format!("Failed to load relevance prior from {path}"))?,
        ),
        (Some(path), false) => {
            info!(path = %path, model = method.kind().id(), "Model ignores the relevance prior");
            None
        }
        (None, _) => None,
    };

    // 5. Rank
    let outcome = rank(&graph, prior.as_ref(), method, settings)?;

    let report = Report {
        model: outcome.model.id(),
        model_name: outcome.model.name(),
        iterations: outcome.iterations,
        converged: outcome.converged,
        delta: outcome.delta,
        documents: outcome.top_documents(config.ranking.results),
        authors: outcome.top_authors(config.ranking.results),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
