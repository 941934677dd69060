//! Convergence test between two score generations

use crate::scores::ScoreVector;
use expertrank_common::errors::{AppError, Result};

/// Outcome of comparing two generations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convergence {
    /// `Σ |current - previous|` over the shared key universe
    pub delta: f64,

    /// `delta < epsilon`
    pub converged: bool,
}

/// Aggregate-delta check against a fixed epsilon
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceChecker {
    epsilon: f64,
}

impl ConvergenceChecker {
    /// `epsilon` is validated by the engine settings before a checker is built
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Compare two generations. Both must hold exactly the same keys.
    pub fn check(&self, current: &ScoreVector, previous: &ScoreVector) -> Result<Convergence> {
        let delta = aggregate_delta(current, previous)?;
        Ok(Convergence {
            delta,
            converged: delta < self.epsilon,
        })
    }
}

/// `Σ_k |current(k) - previous(k)|`
pub fn aggregate_delta(current: &ScoreVector, previous: &ScoreVector) -> Result<f64> {
    let mut delta = 0.0;
    for (id, score) in current.iter() {
        let before = previous
            .get(id)
            .ok_or_else(|| AppError::KeyUniverseMismatch { key: id.clone() })?;
        delta += (score - before).abs();
    }

    if previous.len() != current.len() {
        let key = previous
            .keys()
            .find(|id| !current.contains(id))
            .cloned()
            .unwrap_or_default();
        return Err(AppError::KeyUniverseMismatch { key });
    }

    Ok(delta)
}
