//! # deploycast Similarity
//!
//! Nearest-neighbor deployment prediction over repository feature vectors.
//!
//! ## Features
//!
//! - **Standardization**: zero-mean / unit-variance scaling fit once on the reference data
//! - **Cosine Similarity**: query-to-reference scores plus a precomputed reference matrix
//! - **k-NN Vote**: majority label among the k most similar repositories, nearest neighbor breaks ties
//! - **Explainability**: ranked neighbors and vote counts behind every prediction
//!
//! ## Example
//!
//! ```rust
//! use deploycast_core::{FeatureSchema, ReferenceDataset, ReferenceRow};
//! use deploycast_similarity::DeploymentPredictor;
//!
//! let schema = FeatureSchema::new(vec!["caching".into(), "database".into(), "uses_iac".into()]).unwrap();
//! let dataset = ReferenceDataset::from_rows(schema, vec![
//!     ReferenceRow::new("a/web", "AWS", vec![1, 0, 1]),
//!     ReferenceRow::new("b/api", "AWS", vec![1, 0, 1]),
//!     ReferenceRow::new("c/blog", "Heroku", vec![0, 1, 0]),
//! ]).unwrap();
//!
//! let predictor = DeploymentPredictor::new(dataset).unwrap();
//! assert_eq!(predictor.predict_by_vector(&[1.0, 0.0, 1.0], 2).unwrap(), "AWS");
//! assert_eq!(predictor.predict_by_repository("c/blog", 1).unwrap(), "AWS");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Dataset    │────>│   Scaler    │────>│ Similarity  │
//! │ (rows, CSV) │     │ (mean, std) │     │   Matrix    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   │
//!       query vector ────────┘                   │
//!                      ┌─────────────┐           │
//!                      │  k-NN vote  │<──────────┘
//!                      └─────────────┘
//!                             │
//!                      ┌─────────────┐
//!                      │  Explain    │
//!                      └─────────────┘
//! ```

pub mod distance;
pub mod explain;
pub mod knn;
pub mod predictor;
pub mod scaler;

// Re-export main types for convenience
pub use distance::{cosine_similarity, similarity_row, SimilarityMatrix};
pub use explain::{ExplainedNeighbor, LabelVotes, NeighborStats, Prediction, QueryMode};
pub use knn::{majority_label, nearest_neighbors, rank_neighbors, tally, Neighbor, Vote, DEFAULT_K};
pub use predictor::DeploymentPredictor;
pub use scaler::{StandardScaler, StandardizationParameters};
