//! Explained predictions
//!
//! Output structures that show how a label was reached: the ranked neighbors
//! that were polled and the votes each label received.

use crate::knn::{Neighbor, Vote};
use deploycast_core::ReferenceRow;
use serde::Serialize;

/// How the query was supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// A repository already in the dataset; its own row is excluded
    Lookup,
    /// A freshly supplied feature vector
    Vector,
}

/// A polled neighbor with its repository and label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainedNeighbor {
    pub repository: String,
    pub label: String,
    pub score: f64,
}

impl ExplainedNeighbor {
    pub fn from_row(row: &ReferenceRow, neighbor: &Neighbor) -> Self {
        Self {
            repository: row.repository_id.clone(),
            label: row.label.clone(),
            score: neighbor.score,
        }
    }
}

/// Vote count for one label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelVotes {
    pub label: String,
    pub count: usize,
}

impl From<&Vote<'_>> for LabelVotes {
    fn from(vote: &Vote<'_>) -> Self {
        Self {
            label: vote.label.to_string(),
            count: vote.count,
        }
    }
}

/// A prediction together with the evidence behind it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub mode: QueryMode,
    pub k: usize,
    /// Neighbors in ranked order, most similar first
    pub neighbors: Vec<ExplainedNeighbor>,
    /// Votes in first-occurrence order among `neighbors`
    pub votes: Vec<LabelVotes>,
    pub stats: NeighborStats,
}

/// Summary of the polled neighbors' scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeighborStats {
    pub best_score: f64,
    pub worst_score: f64,
    pub avg_score: f64,
    /// Share of neighbors that voted for the winning label
    pub agreement: f64,
}

impl NeighborStats {
    pub fn compute(neighbors: &[ExplainedNeighbor], label: &str) -> Self {
        if neighbors.is_empty() {
            return Self {
                best_score: 0.0,
                worst_score: 0.0,
                avg_score: 0.0,
                agreement: 0.0,
            };
        }

        let n = neighbors.len() as f64;
        let scores = neighbors.iter().map(|x| x.score);
        let winners = neighbors.iter().filter(|x| x.label == label).count();

        Self {
            // neighbors are ranked, so the extremes sit at either end
            best_score: neighbors[0].score,
            worst_score: neighbors[neighbors.len() - 1].score,
            avg_score: scores.sum::<f64>() / n,
            agreement: winners as f64 / n,
        }
    }
}
