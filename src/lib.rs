//! # deploycast
//!
//! Predicts where a repository should be deployed by comparing its
//! architecture features with a labeled set of historical repositories.
//!
//! A repository is described by a fixed-order vector of 0/1 feature
//! indicators (has CI/CD, uses caching, exposes an API, ...). Every column is
//! standardized with statistics fit once on the reference data, candidates
//! are ranked by cosine similarity, and the k most similar repositories vote
//! on the deployment label.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! deploycast --dataset dataset.csv repository acme/shop
//! deploycast --dataset dataset.csv -k 3 vector 1,0,1,1,0
//! deploycast analyze --directory tree.txt --code digest.txt --json
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use deploycast::prelude::*;
//!
//! let predictor = DeploymentPredictor::from_path("dataset.csv", &DatasetOptions::default()).unwrap();
//!
//! // A repository already in the dataset; it never votes for itself
//! let label = predictor.predict_by_repository("acme/shop", 5).unwrap();
//!
//! // A fresh feature vector, in schema order
//! let query = vec![1.0; predictor.schema().len()];
//! let prediction = predictor.explain_by_vector(&query, 5).unwrap();
//! println!("{label} / {}", prediction.label);
//! ```
//!
//! ## Crate Structure
//!
//! - [`deploycast-core`](https://docs.rs/deploycast-core) - Feature vectors, schema, CSV reference dataset
//! - [`deploycast-similarity`](https://docs.rs/deploycast-similarity) - Standardization, cosine similarity, k-NN vote
//! - [`deploycast-features`](https://docs.rs/deploycast-features) - Feature detection from directory listings and code

pub mod config;

pub use config::{ConfigError, DeploycastConfig};

// Re-export core types
pub use deploycast_core::{
    DatasetOptions, Error, FeatureSchema, FeatureVector, LabelEncoder, ReferenceDataset,
    ReferenceRow, Result,
};

// Re-export prediction
pub use deploycast_similarity::{DeploymentPredictor, Prediction, QueryMode, DEFAULT_K};

// Re-export feature detection
pub use deploycast_features::{
    analyze_project, AnalysisCache, AnalysisError, AnalyzerOptions, ChunkClassifier,
    ChunkedOracle, FeatureOracle, FeatureSet, FeatureVectorBuilder, KeywordClassifier,
    ProjectAnalysis,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        analyze_project, AnalysisCache, AnalyzerOptions, ChunkedOracle, DatasetOptions,
        DeploycastConfig, DeploymentPredictor, Error, FeatureOracle, FeatureSchema, FeatureSet,
        FeatureVector, FeatureVectorBuilder, KeywordClassifier, Prediction, ReferenceDataset,
        Result,
    };
}
