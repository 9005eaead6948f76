//! Feature standardization
//!
//! Per-column zero-mean / unit-variance scaling. Statistics are fit once from
//! the reference feature matrix and then applied unchanged to reference rows
//! and queries alike, which keeps cosine scores comparable across calls.

use deploycast_core::{Error, FeatureVector, Result};
use serde::{Deserialize, Serialize};

/// Per-feature mean and population standard deviation
///
/// A standard deviation of `0.0` marks a zero-variance column; its scaled
/// value is always `0.0`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardizationParameters {
    pub mean: Vec<f64>,
    pub std_dev: Vec<f64>,
}

impl StandardizationParameters {
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Indices of columns that carry no variance in the reference data
    pub fn constant_columns(&self) -> Vec<usize> {
        self.std_dev
            .iter()
            .enumerate()
            .filter(|(_, &s)| s == 0.0)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Standard scaler fitted on a reference feature matrix
#[derive(Debug, Clone)]
pub struct StandardScaler {
    params: StandardizationParameters,
}

impl StandardScaler {
    /// Fit mean and population standard deviation per column
    pub fn fit(matrix: &[FeatureVector]) -> Result<Self> {
        let first = matrix
            .first()
            .ok_or_else(|| Error::Schema("cannot fit scaler on an empty matrix".to_string()))?;
        let dim = first.dim();
        let n = matrix.len() as f64;

        let mut mean = vec![0.0; dim];
        for row in matrix {
            if row.dim() != dim {
                return Err(Error::InvalidDimension {
                    expected: dim,
                    actual: row.dim(),
                });
            }
            for (m, x) in mean.iter_mut().zip(row.as_slice()) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut variance = vec![0.0; dim];
        for row in matrix {
            for ((v, x), m) in variance.iter_mut().zip(row.as_slice()).zip(&mean) {
                let d = x - m;
                *v += d * d;
            }
        }

        let std_dev = variance
            .iter()
            .zip(&mean)
            .map(|(v, m)| {
                let s = (v / n).sqrt();
                if is_negligible_scale(s, *m) {
                    0.0
                } else {
                    s
                }
            })
            .collect();

        Ok(Self {
            params: StandardizationParameters { mean, std_dev },
        })
    }

    /// Rebuild a scaler from previously fitted parameters
    pub fn from_params(params: StandardizationParameters) -> Result<Self> {
        if params.mean.len() != params.std_dev.len() {
            return Err(Error::InvalidDimension {
                expected: params.mean.len(),
                actual: params.std_dev.len(),
            });
        }
        if let Some(i) = params.mean.iter().position(|m| !m.is_finite()) {
            return Err(Error::Schema(format!(
                "mean of feature {i} is {}",
                params.mean[i]
            )));
        }
        if let Some(i) = params
            .std_dev
            .iter()
            .position(|s| !s.is_finite() || *s < 0.0)
        {
            return Err(Error::Schema(format!(
                "standard deviation of feature {i} is {}",
                params.std_dev[i]
            )));
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &StandardizationParameters {
        &self.params
    }

    pub fn dim(&self) -> usize {
        self.params.dim()
    }

    /// Apply `(x - mean) / std` elementwise
    pub fn transform(&self, vector: &FeatureVector) -> Result<FeatureVector> {
        self.transform_slice(vector.as_slice())
    }

    pub fn transform_slice(&self, values: &[f64]) -> Result<FeatureVector> {
        if values.len() != self.dim() {
            return Err(Error::InvalidDimension {
                expected: self.dim(),
                actual: values.len(),
            });
        }

        let scaled = values
            .iter()
            .zip(&self.params.mean)
            .zip(&self.params.std_dev)
            .map(|((x, mean), std)| if *std == 0.0 { 0.0 } else { (x - mean) / std })
            .collect();
        Ok(FeatureVector::new(scaled))
    }

    /// Transform every row of a matrix
    pub fn transform_all(&self, matrix: &[FeatureVector]) -> Result<Vec<FeatureVector>> {
        matrix.iter().map(|row| self.transform(row)).collect()
    }
}

/// Scales this small relative to the mean are rounding noise from a constant column
fn is_negligible_scale(std: f64, mean: f64) -> bool {
    std <= 10.0 * f64::EPSILON * mean.abs().max(1.0)
}
