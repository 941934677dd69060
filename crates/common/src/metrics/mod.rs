//! Metrics for ranking runs
//!
//! Metric names share the `expertrank` prefix. Recording goes through the
//! `metrics` facade, so nothing is exported unless the host process installs
//! a recorder.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all ExpertRank metrics
pub const METRICS_PREFIX: &str = "expertrank";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_ranking_runs_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of completed ranking runs"
    );

    describe_histogram!(
        format!("{}_ranking_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Wall time of a ranking run in seconds"
    );

    describe_histogram!(
        format!("{}_ranking_iterations", METRICS_PREFIX),
        Unit::Count,
        "Update rounds performed per ranking run"
    );

    describe_counter!(
        format!("{}_ranking_cap_reached_total", METRICS_PREFIX),
        Unit::Count,
        "Runs that stopped at the iteration cap without converging"
    );

    describe_counter!(
        format!("{}_graph_faults_total", METRICS_PREFIX),
        Unit::Count,
        "Runs aborted by a graph consistency fault"
    );

    tracing::info!("Metrics registered");
}

/// Times a single ranking run
pub struct RunTimer {
    start: Instant,
    model: &'static str,
}

impl RunTimer {
    /// Start timing a run of `model`
    pub fn start(model: &'static str) -> Self {
        Self {
            start: Instant::now(),
            model,
        }
    }

    /// Record run completion
    pub fn finish(self, iterations: usize, converged: bool) {
        record_ranking_run(
            self.model,
            iterations,
            self.start.elapsed().as_secs_f64(),
            converged,
        );
    }
}

/// Helper to record a completed ranking run
pub fn record_ranking_run(model: &str, iterations: usize, duration_secs: f64, converged: bool) {
    let status = if converged { "converged" } else { "capped" };

    counter!(
        format!("{}_ranking_runs_total", METRICS_PREFIX),
        "model" => model.to_string(),
        "status" => status
    )
    .increment(1);

    histogram!(
        format!("{}_ranking_duration_seconds", METRICS_PREFIX),
        "model" => model.to_string()
    )
    .record(duration_secs);

    histogram!(
        format!("{}_ranking_iterations", METRICS_PREFIX),
        "model" => model.to_string()
    )
    .record(iterations as f64);

    if !converged {
        counter!(
            format!("{}_ranking_cap_reached_total", METRICS_PREFIX),
            "model" => model.to_string()
        )
        .increment(1);
    }
}

/// Helper to record a run aborted by a graph fault
pub fn record_graph_fault(model: &str, kind: &str) {
    counter!(
        format!("{}_graph_faults_total", METRICS_PREFIX),
        "model" => model.to_string(),
        "kind" => kind.to_string()
    )
    .increment(1);
}
