//! Deployment predictor
//!
//! Ties the pipeline together: reference dataset → standard scaler →
//! reference similarity matrix, all built once in the constructor and never
//! mutated afterwards. A predictor that exists is ready; there is no way to
//! call `predict_*` before the dataset is loaded and fitted.
//!
//! The predictor is `Send + Sync` and can be shared between threads as is.

use crate::distance::{similarity_row, SimilarityMatrix};
use crate::explain::{ExplainedNeighbor, LabelVotes, NeighborStats, Prediction, QueryMode};
use crate::knn::{self, nearest_neighbors, tally};
use crate::scaler::StandardScaler;
use deploycast_core::{
    DatasetOptions, Error, FeatureSchema, FeatureVector, LabelEncoder, ReferenceDataset, Result,
};
use std::path::Path;
use tracing::{debug, info};

/// k-NN deployment predictor over a fitted reference dataset
#[derive(Debug, Clone)]
pub struct DeploymentPredictor {
    dataset: ReferenceDataset,
    labels: Vec<String>,
    encoder: LabelEncoder,
    scaler: StandardScaler,
    scaled: Vec<FeatureVector>,
    similarity: SimilarityMatrix,
}

impl DeploymentPredictor {
    /// Load a CSV dataset and fit the predictor on it
    pub fn from_path<P: AsRef<Path>>(path: P, options: &DatasetOptions) -> Result<Self> {
        let dataset = ReferenceDataset::from_path(path, options)?;
        Self::new(dataset)
    }

    /// Fit the predictor on an already loaded dataset
    pub fn new(dataset: ReferenceDataset) -> Result<Self> {
        let matrix = dataset.feature_matrix();
        let scaler = StandardScaler::fit(&matrix)?;
        let constant = scaler.params().constant_columns();
        if !constant.is_empty() {
            let names: Vec<&str> = constant
                .iter()
                .map(|&i| dataset.schema().names()[i].as_str())
                .collect();
            debug!("Zero-variance features contribute nothing: {:?}", names);
        }

        let scaled = scaler.transform_all(&matrix)?;
        let similarity = SimilarityMatrix::compute(&scaled);
        let labels: Vec<String> = dataset.rows().iter().map(|r| r.label.clone()).collect();
        let encoder = LabelEncoder::fit(labels.iter().map(String::as_str));

        info!(
            "Predictor ready: {} repositories, {} features, {} deployment labels",
            dataset.len(),
            dataset.schema().len(),
            encoder.len()
        );

        Ok(Self {
            dataset,
            labels,
            encoder,
            scaler,
            scaled,
            similarity,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.dataset.schema()
    }

    pub fn dataset(&self) -> &ReferenceDataset {
        &self.dataset
    }

    pub fn label_encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn similarity_matrix(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Standardized reference rows, in dataset order
    pub fn scaled_rows(&self) -> &[FeatureVector] {
        &self.scaled
    }

    /// Standardize a raw query vector with the fitted parameters
    pub fn standardize(&self, vector: &[f64]) -> Result<FeatureVector> {
        self.schema().check_dimension(vector.len())?;
        if let Some(i) = vector.iter().position(|x| !x.is_finite()) {
            return Err(Error::NonFiniteValue {
                feature: self.schema().names()[i].clone(),
            });
        }
        self.scaler.transform_slice(vector)
    }

    /// Similarity of a raw query vector to every reference row
    pub fn similarities(&self, vector: &[f64]) -> Result<Vec<f64>> {
        let query = self.standardize(vector)?;
        Ok(similarity_row(&query, &self.scaled))
    }

    /// Predict the deployment label of a repository already in the dataset
    ///
    /// The repository's own row is excluded, so `k` must be in `1..=N-1`.
    pub fn predict_by_repository(&self, repository_id: &str, k: usize) -> Result<&str> {
        let (index, scores) = self.lookup(repository_id)?;
        knn::predict(scores, &self.labels, k, Some(index))
    }

    /// Predict the deployment label for a new feature vector
    ///
    /// `k` must be in `1..=N`.
    pub fn predict_by_vector(&self, vector: &[f64], k: usize) -> Result<&str> {
        let scores = self.similarities(vector)?;
        knn::predict(&scores, &self.labels, k, None)
    }

    /// Lookup-mode prediction with its neighbors and votes
    pub fn explain_by_repository(&self, repository_id: &str, k: usize) -> Result<Prediction> {
        let (index, scores) = self.lookup(repository_id)?;
        self.explain(scores, k, Some(index), QueryMode::Lookup)
    }

    /// Vector-mode prediction with its neighbors and votes
    pub fn explain_by_vector(&self, vector: &[f64], k: usize) -> Result<Prediction> {
        let scores = self.similarities(vector)?;
        self.explain(&scores, k, None, QueryMode::Vector)
    }

    fn lookup(&self, repository_id: &str) -> Result<(usize, &[f64])> {
        let index = self
            .dataset
            .position(repository_id)
            .ok_or_else(|| Error::RepositoryNotFound(repository_id.to_string()))?;
        let scores = self
            .similarity
            .row(index)
            .ok_or_else(|| Error::RepositoryNotFound(repository_id.to_string()))?;
        Ok((index, scores))
    }

    fn explain(&self, scores: &[f64], k: usize, exclude: Option<usize>, mode: QueryMode) -> Result<Prediction> {
        let neighbors = nearest_neighbors(scores, exclude, k)?;
        let votes = tally(neighbors.iter().map(|n| self.labels[n.index].as_str()));
        let label = knn::majority_label(&votes).unwrap_or_default().to_string();

        let neighbors: Vec<ExplainedNeighbor> = neighbors
            .iter()
            .map(|n| ExplainedNeighbor::from_row(&self.dataset.rows()[n.index], n))
            .collect();
        let stats = NeighborStats::compute(&neighbors, &label);
        debug!("Predicted {} ({:?}, k={}, agreement {:.2})", label, mode, k, stats.agreement);

        Ok(Prediction {
            label,
            mode,
            k,
            neighbors,
            votes: votes.iter().map(LabelVotes::from).collect(),
            stats,
        })
    }
}
