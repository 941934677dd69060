//! Result of one ranking run

use crate::graph::NodeId;
use crate::models::ModelKind;
use crate::scores::ScoreVector;
use serde::Serialize;
use std::cmp::Ordering;

/// Final generation of a run plus how it ended
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingOutcome {
    pub model: ModelKind,
    pub documents: ScoreVector,
    pub authors: ScoreVector,
    /// Update rounds performed
    pub iterations: usize,
    pub converged: bool,
    /// Aggregate author delta of the last round
    pub delta: f64,
}

/// One entry of a ranked list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNode {
    pub id: NodeId,
    pub score: f64,
}

impl RankingOutcome {
    /// Best `k` documents, highest score first
    pub fn top_documents(&self, k: usize) -> Vec<RankedNode> {
        top(&self.documents, k)
    }

    /// Best `k` authors, highest score first
    pub fn top_authors(&self, k: usize) -> Vec<RankedNode> {
        top(&self.authors, k)
    }
}

fn top(scores: &ScoreVector, k: usize) -> Vec<RankedNode> {
    let mut ranked: Vec<RankedNode> = scores
        .iter()
        .map(|(id, score)| RankedNode {
            id: id.clone(),
            score,
        })
        .collect();

    // Ties broken by id so the order is total
    ranked.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.id.cmp(&b.id),
        other => other,
    });
    ranked.truncate(k);
    ranked
}
