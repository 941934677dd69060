//! Score vectors
//!
//! One [`ScoreVector`] per node type per generation. Keys are ordered so that
//! every pass over a vector (and every floating-point sum built from one)
//! happens in the same order on every run.

use crate::graph::NodeId;
use expertrank_common::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Node id -> score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreVector {
    scores: BTreeMap<NodeId, f64>,
}

/// Per-document topical relevance, supplied by the topic scorer
pub type RelevancePrior = ScoreVector;

impl ScoreVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every id in `ids` mapped to `value`
    pub fn filled<'a, I>(ids: I, value: f64) -> Self
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        ids.into_iter().map(|id| (id.clone(), value)).collect()
    }

    /// Read a JSON `{ id: score }` map
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.scores.get(id).copied()
    }

    /// Score of `id`, treating ids outside the vector as carrying no mass
    pub fn score_or_zero(&self, id: &str) -> f64 {
        self.get(id).unwrap_or(0.0)
    }

    /// Overwrite the score of `id`, reusing the existing key when present
    pub fn set(&mut self, id: &str, value: f64) {
        match self.scores.get_mut(id) {
            Some(slot) => *slot = value,
            None => {
                self.scores.insert(id.to_string(), value);
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scores.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, f64)> {
        self.scores.iter().map(|(id, score)| (id, *score))
    }

    pub fn keys(&self) -> impl Iterator<Item = &NodeId> {
        self.scores.keys()
    }

    pub fn total(&self) -> f64 {
        self.scores.values().sum()
    }
}

impl FromIterator<(NodeId, f64)> for ScoreVector {
    fn from_iter<T: IntoIterator<Item = (NodeId, f64)>>(iter: T) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use expertrank_common::errors::ErrorCode;

    #[test]
    fn test_set_overwrites_in_place() {
        let ids = vec!["a".to_string(), "b".to_string()];
        let mut scores = ScoreVector::filled(&ids, 0.0);

        scores.set("a", 0.75);
        scores.set("c", 1.0);

        assert_eq!(scores.get("a"), Some(0.75));
        assert_eq!(scores.get("b"), Some(0.0));
        assert_eq!(scores.len(), 3);
        assert_eq!(scores.score_or_zero("missing"), 0.0);
    }

    #[test]
    fn test_transparent_json() {
        let scores: ScoreVector = serde_json::from_str(r#"{"d2": 0.4, "d1": 0.6}"#).unwrap();
        assert_eq!(scores.keys().collect::<Vec<_>>(), vec!["d1", "d2"]);
        assert!((scores.total() - 1.0).abs() < 1e-12);
        assert_eq!(serde_json::to_string(&scores).unwrap(), r#"{"d1":0.6,"d2":0.4}"#);
    }

    #[test]
    fn test_load_prior_file() {
        let name = format!("expertrank-prior-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        fs::write(&path, r#"{"d1": 0.9, "d2": 0.1}"#).unwrap();
        let prior = ScoreVector::from_path(&path);
        fs::remove_file(&path).unwrap();

        let prior = prior.unwrap();
        assert_eq!(prior.get("d1"), Some(0.9));
        assert_eq!(prior.len(), 2);
    }

    #[test]
    fn test_load_prior_failures() {
        let err = ScoreVector::from_path("/nonexistent/expertrank/prior.json").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InternalError);

        let name = format!("expertrank-bad-prior-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        fs::write(&path, "[1, 2").unwrap();
        let err = ScoreVector::from_path(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert_eq!(err.code(), ErrorCode::SerializationError);
    }
}
