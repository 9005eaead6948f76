//! # deploycast Core
//!
//! Core library for the deploycast deployment predictor.
//!
//! This crate provides the data model shared by every other crate:
//!
//! - [`FeatureVector`] - Ordered numeric feature values
//! - [`FeatureSchema`] - Ordered feature names giving each position its meaning
//! - [`ReferenceDataset`] - Labeled historical repositories loaded from CSV
//! - [`LabelEncoder`] - Deployment label to integer code mapping
//!
//! ## Example
//!
//! ```rust
//! use deploycast_core::{DatasetOptions, ReferenceDataset};
//!
//! let csv = "repository,deployment,caching,database\n\
//!            a/web,AWS,Yes,No\n\
//!            b/blog,Heroku,No,No\n";
//! let dataset = ReferenceDataset::from_reader(csv.as_bytes(), &DatasetOptions::default()).unwrap();
//!
//! assert_eq!(dataset.schema().names(), &["caching", "database"]);
//! assert_eq!(dataset.get("a/web").unwrap().features, vec![1, 0]);
//! ```

pub mod dataset;
pub mod error;
pub mod label;
pub mod schema;
pub mod vector;

pub use dataset::{
    parse_indicator, DatasetOptions, ReferenceDataset, ReferenceRow, DEFAULT_ID_COLUMN,
    DEFAULT_LABEL_COLUMN,
};
pub use error::{Error, Result};
pub use label::LabelEncoder;
pub use schema::{FeatureSchema, MIN_FEATURES};
pub use vector::FeatureVector;
