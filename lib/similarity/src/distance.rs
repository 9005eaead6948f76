//! Cosine similarity over standardized feature vectors
//!
//! Scores are in [-1.0, 1.0]. A zero-magnitude operand scores 0.0 ("no
//! directional similarity") rather than failing.

use deploycast_core::FeatureVector;
use rayon::prelude::*;
use serde::Serialize;

/// Cosine similarity between two vectors
///
/// # Returns
/// `dot(a, b) / (|a| * |b|)`, or 0.0 when either vector has zero magnitude
#[inline]
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.cosine_similarity(b)
}

/// Score one query against every reference row, in row order
pub fn similarity_row(query: &FeatureVector, rows: &[FeatureVector]) -> Vec<f64> {
    rows.iter().map(|row| cosine_similarity(query, row)).collect()
}

/// Dense reference-to-reference similarity matrix
///
/// Computed once at load time for lookups of repositories already in the
/// dataset. Row-major, symmetric.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute all pairwise similarities; rows are scored in parallel
    pub fn compute(rows: &[FeatureVector]) -> Self {
        let size = rows.len();
        let data = rows
            .par_iter()
            .flat_map_iter(|a| rows.iter().map(move |b| cosine_similarity(a, b)))
            .collect();
        Self { size, data }
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.size {
            return None;
        }
        let start = index * self.size;
        Some(&self.data[start..start + self.size])
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.row(i).and_then(|r| r.get(j).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(data: &[f64]) -> FeatureVector {
        FeatureVector::from_slice(data)
    }

    #[test]
    fn test_cosine_range_and_orientation() {
        assert_eq!(cosine_similarity(&v(&[1.0, 2.0]), &v(&[2.0, 4.0])), 1.0);
        assert_eq!(cosine_similarity(&v(&[1.0, 0.0]), &v(&[0.0, 3.0])), 0.0);
        assert_eq!(cosine_similarity(&v(&[1.0, -1.0]), &v(&[-1.0, 1.0])), -1.0);
    }

    #[test]
    fn test_zero_vector() {
        assert_eq!(cosine_similarity(&v(&[0.0, 0.0]), &v(&[1.0, 1.0])), 0.0);
    }

    #[test]
    fn test_similarity_row_order() {
        let rows = vec![v(&[1.0, 0.0]), v(&[0.0, 1.0]), v(&[1.0, 1.0])];
        let scores = similarity_row(&v(&[1.0, 0.0]), &rows);
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0], 1.0);
        assert_eq!(scores[1], 0.0);
        assert!((scores[2] - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let rows = vec![
            v(&[1.2, -0.5, 0.3]),
            v(&[-0.7, 1.1, 0.0]),
            v(&[0.4, 0.4, -1.3]),
            v(&[-0.9, -1.0, 1.0]),
        ];
        let matrix = SimilarityMatrix::compute(&rows);
        assert_eq!(matrix.size(), 4);

        for i in 0..4 {
            assert_eq!(matrix.get(i, i), Some(1.0));
            for j in 0..4 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
                let s = matrix.get(i, j).unwrap();
                assert!((-1.0..=1.0).contains(&s));
            }
        }
        assert_eq!(matrix.row(4), None);
        assert_eq!(matrix.get(0, 4), None);
    }

    #[test]
    fn test_matrix_row_matches_similarity_row() {
        let rows = vec![v(&[1.0, 0.0, 1.0]), v(&[0.0, 1.0, 0.0]), v(&[1.0, 1.0, 0.0])];
        let matrix = SimilarityMatrix::compute(&rows);
        assert_eq!(matrix.row(2).unwrap(), similarity_row(&rows[2], &rows).as_slice());
    }
}
