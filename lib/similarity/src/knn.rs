//! k-nearest-neighbor majority vote
//!
//! Candidates are ranked by similarity, highest first; equal scores keep
//! dataset order. The k best are polled and the most frequent label wins.
//! When several labels share the top count, the one whose first appearance
//! in the ranked neighbor list comes earliest wins, i.e. the nearest
//! neighbor among the tied labels decides.

use ahash::AHashMap;
use deploycast_core::{Error, Result};
use ordered_float::OrderedFloat;
use serde::Serialize;

/// Default number of neighbors polled
pub const DEFAULT_K: usize = 5;

/// A reference row ranked against a query
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub index: usize,
    pub score: f64,
}

/// Votes for one label, in first-occurrence order among neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Vote<'a> {
    pub label: &'a str,
    pub count: usize,
}

/// Rank every candidate by score descending, optionally skipping one index
///
/// The sort is stable, so equal scores stay in ascending index order.
pub fn rank_neighbors(similarities: &[f64], exclude: Option<usize>) -> Vec<Neighbor> {
    let mut ranked: Vec<Neighbor> = similarities
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != exclude)
        .map(|(index, &score)| Neighbor { index, score })
        .collect();

    ranked.sort_by(|a, b| OrderedFloat(b.score).cmp(&OrderedFloat(a.score)));
    ranked
}

/// Validate `0 < k <= candidates`
pub fn check_k(k: usize, candidates: usize) -> Result<()> {
    if k == 0 || k > candidates {
        return Err(Error::InvalidK { k, max: candidates });
    }
    Ok(())
}

/// The `k` most similar candidates
///
/// With `exclude` set (lookup mode) that row is never a candidate, so at
/// most `N - 1` neighbors exist.
pub fn nearest_neighbors(similarities: &[f64], exclude: Option<usize>, k: usize) -> Result<Vec<Neighbor>> {
    let excluded = exclude.map_or(0, |i| usize::from(i < similarities.len()));
    check_k(k, similarities.len() - excluded)?;

    let mut ranked = rank_neighbors(similarities, exclude);
    ranked.truncate(k);
    Ok(ranked)
}

/// Count labels, keeping the order in which each label first appears
pub fn tally<'a, I>(labels: I) -> Vec<Vote<'a>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut votes: Vec<Vote<'a>> = Vec::new();
    let mut slots: AHashMap<&'a str, usize> = AHashMap::new();

    for label in labels {
        match slots.get(label).copied() {
            Some(slot) => votes[slot].count += 1,
            None => {
                slots.insert(label, votes.len());
                votes.push(Vote { label, count: 1 });
            }
        }
    }
    votes
}

/// Label with the highest count; ties go to the earliest in `votes`
pub fn majority_label<'a>(votes: &[Vote<'a>]) -> Option<&'a str> {
    let mut best: Option<Vote<'a>> = None;
    for vote in votes {
        if best.map_or(true, |b| vote.count > b.count) {
            best = Some(*vote);
        }
    }
    best.map(|b| b.label)
}

/// Predict a label from one row of similarities
///
/// # Arguments
/// * `similarities` - one score per reference row
/// * `labels` - one label per reference row, same order
/// * `k` - neighbors to poll
/// * `exclude` - row to leave out (the query itself in lookup mode)
pub fn predict<'a, L>(similarities: &[f64], labels: &'a [L], k: usize, exclude: Option<usize>) -> Result<&'a str>
where
    L: AsRef<str>,
{
    if similarities.len() != labels.len() {
        return Err(Error::InvalidDimension {
            expected: labels.len(),
            actual: similarities.len(),
        });
    }

    let neighbors = nearest_neighbors(similarities, exclude, k)?;
    let votes = tally(neighbors.iter().map(|n| labels[n.index].as_ref()));
    // k > 0 was checked, so there is at least one vote
    Ok(majority_label(&votes).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_is_descending_and_stable() {
        let ranked = rank_neighbors(&[0.2, 0.9, 0.5, 0.9, -0.3], None);
        let order: Vec<usize> = ranked.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![1, 3, 2, 0, 4]);
    }

    #[test]
    fn test_rank_excludes_self() {
        let ranked = rank_neighbors(&[1.0, 0.4, 1.0], Some(0));
        let order: Vec<usize> = ranked.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn test_k_bounds_vector_mode() {
        let scores = [0.1, 0.2, 0.3];
        assert!(nearest_neighbors(&scores, None, 3).is_ok());
        assert!(matches!(
            nearest_neighbors(&scores, None, 0),
            Err(Error::InvalidK { k: 0, max: 3 })
        ));
        assert!(matches!(
            nearest_neighbors(&scores, None, 4),
            Err(Error::InvalidK { k: 4, max: 3 })
        ));
    }

    #[test]
    fn test_k_bounds_lookup_mode() {
        let scores = [1.0, 0.2, 0.3];
        assert!(nearest_neighbors(&scores, Some(0), 2).is_ok());
        assert!(matches!(
            nearest_neighbors(&scores, Some(0), 3),
            Err(Error::InvalidK { k: 3, max: 2 })
        ));
    }

    #[test]
    fn test_tally_first_occurrence_order() {
        let votes = tally(["GCP", "AWS", "GCP", "Heroku", "AWS"]);
        assert_eq!(
            votes,
            vec![
                Vote { label: "GCP", count: 2 },
                Vote { label: "AWS", count: 2 },
                Vote { label: "Heroku", count: 1 },
            ]
        );
    }

    #[test]
    fn test_majority_wins() {
        let labels = ["AWS", "Heroku", "Heroku", "AWS", "Heroku"];
        let scores = [0.9, 0.8, 0.7, 0.6, 0.5];
        assert_eq!(predict(&scores, &labels, 5, None).unwrap(), "Heroku");
        assert_eq!(predict(&scores, &labels, 1, None).unwrap(), "AWS");
    }

    #[test]
    fn test_tie_goes_to_nearest_neighbor() {
        // ranked: Heroku (0.95), AWS (0.9), AWS (0.8), Heroku (0.7)
        let labels = ["AWS", "Heroku", "AWS", "Heroku"];
        let scores = [0.9, 0.95, 0.8, 0.7];
        assert_eq!(predict(&scores, &labels, 4, None).unwrap(), "Heroku");

        // flip the nearest neighbor and the winner flips with it
        let scores = [0.96, 0.95, 0.8, 0.7];
        assert_eq!(predict(&scores, &labels, 4, None).unwrap(), "AWS");
    }

    #[test]
    fn test_tie_among_equal_scores_uses_dataset_order() {
        let labels = ["Heroku", "AWS"];
        let scores = [0.5, 0.5];
        assert_eq!(predict(&scores, &labels, 2, None).unwrap(), "Heroku");
    }

    #[test]
    fn test_lookup_mode_skips_self() {
        let labels = ["AWS", "Heroku", "Heroku"];
        let scores = [1.0, 0.7, 0.6];
        assert_eq!(predict(&scores, &labels, 1, Some(0)).unwrap(), "Heroku");
    }

    #[test]
    fn test_length_mismatch() {
        let labels = ["AWS", "Heroku"];
        assert!(matches!(
            predict(&[0.1, 0.2, 0.3], &labels, 1, None),
            Err(Error::InvalidDimension { .. })
        ));
    }
}
