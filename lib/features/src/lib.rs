//! # deploycast Features
//!
//! Architecture feature detection for a repository.
//!
//! - [`detect_directory_features`] - infrastructure traits from the directory tree
//! - [`filter_skipped_files`] and [`chunk_by_files`] - prepare a code digest
//! - [`FeatureOracle`] / [`ChunkedOracle`] - code traits, chunk by chunk
//! - [`analyze_project`] - all of the above, combined into one [`FeatureSet`]
//! - [`FeatureVectorBuilder`] - lay a [`FeatureSet`] out as a schema-ordered vector
//!
//! ## Example
//!
//! ```rust
//! use deploycast_features::{
//!     analyze_project, AnalysisCache, AnalyzerOptions, ChunkedOracle, KeywordClassifier,
//! };
//! use std::sync::Arc;
//!
//! let oracle = ChunkedOracle::new(KeywordClassifier::new(), Arc::new(AnalysisCache::new()));
//! let analysis = analyze_project(
//!     "shop/\n├── Dockerfile\n└── src/",
//!     "",
//!     &oracle,
//!     &AnalyzerOptions::default(),
//! )
//! .unwrap();
//!
//! assert!(analysis.combined.is_present("uses_containerization"));
//! assert!(!analysis.combined.is_present("database"));
//! ```

pub mod builder;
pub mod cache;
pub mod catalog;
pub mod chunker;
pub mod error;
pub mod ingest;
pub mod keyword;
pub mod oracle;
pub mod patterns;

pub use builder::{analyze_project, AnalyzerOptions, FeatureVectorBuilder, ProjectAnalysis};
pub use cache::{AnalysisCache, CacheStats};
pub use catalog::{
    FeatureDetection, FeatureSet, CODE_FEATURES, DIRECTORY_FEATURES, NOT_FOUND,
    REQUIRED_CODE_FEATURES,
};
pub use chunker::{chunk_by_files, DEFAULT_CHUNK_SIZE};
pub use error::{AnalysisError, Result};
pub use ingest::{filter_skipped_files, DEFAULT_SKIP_EXTENSIONS, FILE_HEADER_RULE};
pub use keyword::KeywordClassifier;
pub use oracle::{ChunkAnalysis, ChunkClassifier, ChunkedOracle, FeatureFinding, FeatureOracle};
pub use patterns::detect_directory_features;
