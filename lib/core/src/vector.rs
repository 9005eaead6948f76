use serde::{Deserialize, Serialize};

/// An ordered vector of feature values, positioned by a [`FeatureSchema`](crate::FeatureSchema)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FeatureVector {
    data: Vec<f64>,
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f64]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Build a 0/1 indicator vector from presence flags
    #[must_use]
    pub fn from_flags(flags: &[bool]) -> Self {
        Self {
            data: flags.iter().map(|&f| if f { 1.0 } else { 0.0 }).collect(),
        }
    }

    /// Build from integer indicators as stored in the reference dataset
    #[must_use]
    pub fn from_indicators(values: &[i64]) -> Self {
        Self {
            data: values.iter().map(|&v| v as f64).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Dot product; vectors of different dimension score 0.0
    #[inline]
    pub fn dot(&self, other: &FeatureVector) -> f64 {
        if self.dim() != other.dim() {
            return 0.0;
        }
        dot_product(&self.data, &other.data)
    }

    #[inline]
    pub fn norm_squared(&self) -> f64 {
        dot_product(&self.data, &self.data)
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Compute cosine similarity with another vector
    ///
    /// Zero-magnitude operands (and mismatched dimensions) score 0.0.
    /// The denominator is taken as `sqrt(|a|² · |b|²)` so a non-zero vector
    /// compared with itself yields exactly 1.0.
    #[inline]
    pub fn cosine_similarity(&self, other: &FeatureVector) -> f64 {
        if self.dim() != other.dim() {
            return 0.0;
        }

        let norm_sq_a = self.norm_squared();
        let norm_sq_b = other.norm_squared();
        if norm_sq_a == 0.0 || norm_sq_b == 0.0 {
            return 0.0;
        }

        let dot = dot_product(&self.data, &other.data);
        (dot / (norm_sq_a * norm_sq_b).sqrt()).clamp(-1.0, 1.0)
    }
}

/// Dot product with two accumulators for better pipelining
#[inline]
fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    let mut sum1 = 0.0;
    let mut sum2 = 0.0;
    let mut pairs_a = a.chunks_exact(2);
    let mut pairs_b = b.chunks_exact(2);

    for (x, y) in (&mut pairs_a).zip(&mut pairs_b) {
        sum1 += x[0] * y[0];
        sum2 += x[1] * y[1];
    }
    for (x, y) in pairs_a.remainder().iter().zip(pairs_b.remainder()) {
        sum1 += x * y;
    }

    sum1 + sum2
}
