//! Code feature oracle
//!
//! The code-level detector is consumed through two seams:
//!
//! - [`ChunkClassifier`] turns one digest chunk into a [`ChunkAnalysis`]. A
//!   language-model client implements it by sending the chunk and feeding the
//!   JSON reply to [`ChunkAnalysis::from_json`].
//! - [`FeatureOracle`] turns a whole chunked digest into a [`FeatureSet`].
//!   [`ChunkedOracle`] implements it on top of any classifier, with an
//!   injected [`AnalysisCache`].

use crate::cache::AnalysisCache;
use crate::catalog::{FeatureDetection, FeatureSet, CODE_FEATURES, NOT_FOUND, REQUIRED_CODE_FEATURES};
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Chunks shorter than this (trimmed) are file headers with no code worth sending
pub const MIN_CHUNK_CHARS: usize = 100;

/// One feature as reported for one chunk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFinding {
    pub present: bool,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub improvements: String,
}

impl FeatureFinding {
    pub fn present(details: impl Into<String>) -> Self {
        Self {
            present: true,
            details: details.into(),
            improvements: String::new(),
        }
    }
}

/// Per-feature findings for one chunk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkAnalysis {
    findings: BTreeMap<String, FeatureFinding>,
}

impl ChunkAnalysis {
    /// Parse a classifier's JSON reply
    ///
    /// Keys are trimmed and lower-cased. Every feature in
    /// [`REQUIRED_CODE_FEATURES`] must be present with a boolean `present`;
    /// other known features default to not present when missing. Unknown
    /// keys are ignored.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let object = value
            .as_object()
            .ok_or_else(|| AnalysisError::MalformedResponse("expected a JSON object".to_string()))?;
        let entries: BTreeMap<String, &Value> = object
            .iter()
            .map(|(k, v)| (k.trim().to_lowercase(), v))
            .collect();

        for &required in REQUIRED_CODE_FEATURES {
            let entry = entries
                .get(required)
                .ok_or_else(|| AnalysisError::MissingFeature(required.to_string()))?;
            if !entry.get("present").is_some_and(Value::is_boolean) {
                return Err(AnalysisError::InvalidFeature(required.to_string()));
            }
        }

        let findings = CODE_FEATURES
            .iter()
            .filter_map(|&feature| {
                let entry = entries.get(feature)?;
                let finding = FeatureFinding {
                    present: entry.get("present").and_then(Value::as_bool).unwrap_or(false),
                    details: text_field(entry.get("details")),
                    improvements: text_field(entry.get("improvements")),
                };
                Some((feature.to_string(), finding))
            })
            .collect();

        Ok(Self { findings })
    }

    pub fn set(&mut self, feature: impl Into<String>, finding: FeatureFinding) {
        self.findings.insert(feature.into(), finding);
    }

    pub fn finding(&self, feature: &str) -> Option<&FeatureFinding> {
        self.findings.get(feature)
    }

    pub fn is_present(&self, feature: &str) -> bool {
        self.findings.get(feature).is_some_and(|f| f.present)
    }
}

/// Models sometimes answer with a list or a number where text was asked for
fn text_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| text_field(Some(item)))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        Some(other) => other.to_string(),
    }
}

/// Classifies one chunk of code
pub trait ChunkClassifier: Send + Sync {
    fn classify(&self, chunk: &str) -> Result<ChunkAnalysis>;
}

impl<F> ChunkClassifier for F
where
    F: Fn(&str) -> Result<ChunkAnalysis> + Send + Sync,
{
    fn classify(&self, chunk: &str) -> Result<ChunkAnalysis> {
        self(chunk)
    }
}

/// Detects code features across a chunked digest
pub trait FeatureOracle {
    fn detect_features(&self, chunks: &[String]) -> Result<FeatureSet>;
}

/// Oracle that classifies chunk by chunk and merges the findings
///
/// A feature is present when any chunk reports it. Chunks that fail to
/// classify are logged and left out; the analysis carries on with the rest.
pub struct ChunkedOracle<C> {
    classifier: C,
    cache: Arc<AnalysisCache>,
    min_chunk_chars: usize,
}

impl<C: ChunkClassifier> ChunkedOracle<C> {
    pub fn new(classifier: C, cache: Arc<AnalysisCache>) -> Self {
        Self {
            classifier,
            cache,
            min_chunk_chars: MIN_CHUNK_CHARS,
        }
    }

    pub fn with_min_chunk_chars(mut self, min_chunk_chars: usize) -> Self {
        self.min_chunk_chars = min_chunk_chars;
        self
    }

    pub fn cache(&self) -> &Arc<AnalysisCache> {
        &self.cache
    }

    fn analyze_chunk(&self, number: usize, chunk: &str) -> Option<ChunkAnalysis> {
        if chunk.trim().chars().count() < self.min_chunk_chars {
            debug!("[chunk {}] skipping small chunk", number);
            return None;
        }

        if let Some(cached) = self.cache.get(chunk) {
            debug!("[chunk {}] using cached analysis", number);
            return Some(cached);
        }

        debug!("[chunk {}] classifying {} characters", number, chunk.len());
        match self.classifier.classify(chunk) {
            Ok(analysis) => {
                self.cache.insert(chunk, analysis.clone());
                Some(analysis)
            }
            Err(e) => {
                warn!("[chunk {}] classification failed: {}", number, e);
                None
            }
        }
    }
}

impl<C: ChunkClassifier> FeatureOracle for ChunkedOracle<C> {
    fn detect_features(&self, chunks: &[String]) -> Result<FeatureSet> {
        let mut merged: BTreeMap<&str, (bool, Vec<String>)> = CODE_FEATURES
            .iter()
            .map(|&f| (f, (false, Vec::new())))
            .collect();
        let mut analyzed = 0usize;

        for (i, chunk) in chunks.iter().enumerate() {
            let Some(analysis) = self.analyze_chunk(i + 1, chunk) else {
                continue;
            };
            analyzed += 1;

            for (&feature, (present, details)) in merged.iter_mut() {
                let Some(finding) = analysis.finding(feature).filter(|f| f.present) else {
                    continue;
                };
                *present = true;
                if !finding.details.is_empty() && !details.contains(&finding.details) {
                    details.push(finding.details.clone());
                }
            }
        }

        info!("Analyzed {} of {} chunks", analyzed, chunks.len());

        Ok(merged
            .into_iter()
            .map(|(feature, (present, details))| {
                let details = if details.is_empty() {
                    NOT_FOUND.to_string()
                } else {
                    details.join("\n")
                };
                (feature.to_string(), FeatureDetection { present, details })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const REPLY: &str = r#"{
        " Authentication ": {"present": true, "details": "JWT middleware", "improvements": ""},
        "database": {"present": true, "details": ["Postgres via Prisma", "migrations"]},
        "caching": {"present": false, "details": "", "improvements": "Add Redis for sessions"},
        "storage": {"present": false},
        "microservices": {"present": false, "details": null},
        "monolith": {"present": true, "details": "single Express app"},
        "unknown_feature": {"present": true}
    }"#;

    fn code_chunk(tag: &str) -> String {
        format!("// {tag}\n{}", "let value = compute();\n".repeat(10))
    }

    #[test]
    fn test_parse_reply() {
        let analysis = ChunkAnalysis::from_json(REPLY).unwrap();
        assert!(analysis.is_present("authentication"));
        assert_eq!(analysis.finding("authentication").unwrap().details, "JWT middleware");
        assert_eq!(
            analysis.finding("database").unwrap().details,
            "Postgres via Prisma; migrations"
        );
        assert_eq!(
            analysis.finding("caching").unwrap().improvements,
            "Add Redis for sessions"
        );
        assert!(analysis.is_present("monolith"));
        assert!(!analysis.is_present("message_queues"));
        assert!(analysis.finding("unknown_feature").is_none());
    }

    #[test]
    fn test_parse_rejects_missing_required() {
        let reply = r#"{"authentication": {"present": true}, "database": {"present": false}}"#;
        assert!(matches!(
            ChunkAnalysis::from_json(reply),
            Err(AnalysisError::MissingFeature(f)) if f == "caching"
        ));
    }

    #[test]
    fn test_parse_rejects_non_boolean_present() {
        let reply = r#"{
            "authentication": {"present": "yes"},
            "database": {"present": false},
            "caching": {"present": false},
            "storage": {"present": false},
            "microservices": {"present": false}
        }"#;
        assert!(matches!(
            ChunkAnalysis::from_json(reply),
            Err(AnalysisError::InvalidFeature(f)) if f == "authentication"
        ));
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(ChunkAnalysis::from_json("Sure! Here is"), Err(AnalysisError::Json(_))));
        assert!(matches!(
            ChunkAnalysis::from_json("[1, 2]"),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_merges_across_chunks() {
        let classifier = |chunk: &str| -> Result<ChunkAnalysis> {
            let mut analysis = ChunkAnalysis::default();
            if chunk.contains("first") {
                analysis.set("caching", FeatureFinding::present("Redis"));
                analysis.set("database", FeatureFinding::present("Postgres"));
            } else {
                analysis.set("database", FeatureFinding::present("Postgres"));
                analysis.set("storage", FeatureFinding::present("S3 uploads"));
            }
            Ok(analysis)
        };
        let oracle = ChunkedOracle::new(classifier, Arc::new(AnalysisCache::new()));
        let features = oracle
            .detect_features(&[code_chunk("first"), code_chunk("second")])
            .unwrap();

        assert_eq!(features.len(), CODE_FEATURES.len());
        assert!(features.is_present("caching"));
        assert!(features.is_present("storage"));
        assert_eq!(features.get("database").unwrap().details, "Postgres");
        assert!(!features.is_present("monolith"));
        assert_eq!(features.get("monolith").unwrap().details, NOT_FOUND);
    }

    #[test]
    fn test_small_chunks_are_not_classified() {
        let calls = AtomicUsize::new(0);
        let classifier = |_: &str| -> Result<ChunkAnalysis> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(ChunkAnalysis::default())
        };
        let oracle = ChunkedOracle::new(&classifier, Arc::new(AnalysisCache::new()));
        oracle
            .detect_features(&["File: a.rs".to_string(), code_chunk("real")])
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cache_prevents_repeat_calls_and_is_merged() {
        let calls = AtomicUsize::new(0);
        let classifier = |_: &str| -> Result<ChunkAnalysis> {
            calls.fetch_add(1, Ordering::SeqCst);
            let mut analysis = ChunkAnalysis::default();
            analysis.set("caching", FeatureFinding::present("Redis"));
            Ok(analysis)
        };
        let cache = Arc::new(AnalysisCache::new());
        let chunk = code_chunk("same");

        let oracle = ChunkedOracle::new(&classifier, Arc::clone(&cache));
        oracle.detect_features(&[chunk.clone()]).unwrap();
        let second = oracle.detect_features(&[chunk]).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(second.is_present("caching"));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_failed_chunk_is_skipped() {
        let classifier = |chunk: &str| -> Result<ChunkAnalysis> {
            if chunk.contains("broken") {
                return Err(AnalysisError::Classifier("rate limited".to_string()));
            }
            let mut analysis = ChunkAnalysis::default();
            analysis.set("api_exposed", FeatureFinding::present("REST routes"));
            Ok(analysis)
        };
        let cache = Arc::new(AnalysisCache::new());
        let oracle = ChunkedOracle::new(classifier, Arc::clone(&cache));
        let features = oracle
            .detect_features(&[code_chunk("broken"), code_chunk("fine")])
            .unwrap();

        assert!(features.is_present("api_exposed"));
        // failures are not cached
        assert_eq!(cache.len(), 1);
    }
}
