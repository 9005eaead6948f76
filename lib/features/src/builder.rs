//! Project analysis and feature vector building

use crate::catalog::FeatureSet;
use crate::chunker::{chunk_by_files, DEFAULT_CHUNK_SIZE};
use crate::error::Result;
use crate::ingest::{filter_skipped_files, DEFAULT_SKIP_EXTENSIONS};
use crate::oracle::FeatureOracle;
use crate::patterns::detect_directory_features;
use deploycast_core::{Error, FeatureSchema, FeatureVector};
use serde::Serialize;
use tracing::{debug, info};

/// Knobs for [`analyze_project`]
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    pub chunk_size: usize,
    pub skip_extensions: Vec<String>,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            skip_extensions: DEFAULT_SKIP_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Features detected for one repository, per source and combined
#[derive(Debug, Clone, Serialize)]
pub struct ProjectAnalysis {
    pub directory: FeatureSet,
    pub code: FeatureSet,
    pub combined: FeatureSet,
}

/// Detect every feature of a repository from its directory listing and code digest
///
/// A feature is present in `combined` when either source reports it. Details
/// prefer the oracle's over the directory matcher's.
pub fn analyze_project<O: FeatureOracle + ?Sized>(
    directory: &str,
    code: &str,
    oracle: &O,
    options: &AnalyzerOptions,
) -> Result<ProjectAnalysis> {
    let directory_features = detect_directory_features(directory);

    let filtered = filter_skipped_files(code, options.skip_extensions.as_slice());
    let chunks = chunk_by_files(&filtered, options.chunk_size);
    info!(
        "Analyzing {} characters of code in {} chunks",
        filtered.len(),
        chunks.len()
    );

    let code_features = oracle.detect_features(&chunks)?;
    let combined = FeatureSet::combine(&code_features, &directory_features);
    info!("Detected {} features", combined.present().count());

    Ok(ProjectAnalysis {
        directory: directory_features,
        code: code_features,
        combined,
    })
}

/// Turns a [`FeatureSet`] into a vector laid out by a [`FeatureSchema`]
#[derive(Debug, Clone)]
pub struct FeatureVectorBuilder {
    schema: FeatureSchema,
}

impl FeatureVectorBuilder {
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Emit 1.0 for present and 0.0 for absent features, in schema order
    pub fn build(&self, features: &FeatureSet) -> deploycast_core::Result<FeatureVector> {
        let flags = self
            .schema
            .iter()
            .map(|name| {
                features
                    .get(name)
                    .map(|d| d.present)
                    .ok_or_else(|| Error::MissingFeature(name.to_string()))
            })
            .collect::<deploycast_core::Result<Vec<bool>>>()?;

        for (name, _) in features.iter() {
            if self.schema.position(name).is_none() {
                debug!("Ignoring feature '{}' not in schema", name);
            }
        }

        Ok(FeatureVector::from_flags(&flags))
    }
}
