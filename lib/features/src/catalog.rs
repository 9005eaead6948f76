//! Feature catalog and detection results
//!
//! Names every architecture feature the analyzers know about and the
//! name-keyed result type they produce.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Details text for a feature no source reported
pub const NOT_FOUND: &str = "Not found";

/// Infrastructure features detected from the directory listing, with the
/// path fragments that indicate them
pub const DIRECTORY_FEATURES: &[(&str, &[&str])] = &[
    (
        "already_deployed",
        &["docker-compose.yml", "kubernetes", "deploy.sh", ".env.production"],
    ),
    (
        "has_frontend",
        &["src/frontend", "public", "index.html", "components", "pages"],
    ),
    (
        "has_cicd",
        &[".github/workflows", "jenkins", "gitlab-ci.yml", ".travis.yml"],
    ),
    ("multiple_environments", &[".env.", "config/environments"]),
    (
        "uses_containerization",
        &["dockerfile", "docker-compose", "kubernetes"],
    ),
    ("uses_iac", &["terraform", "cloudformation", "pulumi", "ansible"]),
    (
        "high_availability",
        &["kubernetes", "docker-swarm", "load-balancer"],
    ),
];

/// Code-level features reported by a chunk classifier
pub const CODE_FEATURES: &[&str] = &[
    "authentication",
    "realtime_events",
    "storage",
    "caching",
    "ai_implementation",
    "database",
    "microservices",
    "monolith",
    "api_exposed",
    "message_queues",
    "background_jobs",
    "sensitive_data",
    "external_apis",
];

/// Code features a classifier response must carry to be accepted
pub const REQUIRED_CODE_FEATURES: &[&str] =
    &["authentication", "database", "caching", "storage", "microservices"];

/// Presence of one feature plus free-text evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDetection {
    pub present: bool,
    pub details: String,
}

impl FeatureDetection {
    pub fn found(details: impl Into<String>) -> Self {
        Self {
            present: true,
            details: details.into(),
        }
    }

    pub fn absent() -> Self {
        Self {
            present: false,
            details: NOT_FOUND.to_string(),
        }
    }
}

/// Feature name → detection, iterated in name order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet {
    features: BTreeMap<String, FeatureDetection>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, detection: FeatureDetection) {
        self.features.insert(name.into(), detection);
    }

    pub fn get(&self, name: &str) -> Option<&FeatureDetection> {
        self.features.get(name)
    }

    /// Whether a feature was reported present; unknown names are not present
    pub fn is_present(&self, name: &str) -> bool {
        self.features.get(name).is_some_and(|d| d.present)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureDetection)> {
        self.features.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of the features reported present
    pub fn present(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, d)| d.present).map(|(k, _)| k)
    }

    /// Merge two sources: present if either says so
    ///
    /// Details come from `primary` when it reports the feature present,
    /// otherwise from `secondary` when that one does.
    pub fn combine(primary: &FeatureSet, secondary: &FeatureSet) -> FeatureSet {
        let mut combined = FeatureSet::new();
        for name in primary.features.keys().chain(secondary.features.keys()) {
            if combined.contains(name) {
                continue;
            }
            let a = primary.get(name).filter(|d| d.present);
            let b = secondary.get(name).filter(|d| d.present);
            let detection = a.or(b).cloned().unwrap_or_else(FeatureDetection::absent);
            combined.insert(name.clone(), detection);
        }
        combined
    }
}

impl FromIterator<(String, FeatureDetection)> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = (String, FeatureDetection)>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_no_overlap() {
        for (name, _) in DIRECTORY_FEATURES {
            assert!(!CODE_FEATURES.contains(name));
        }
        for required in REQUIRED_CODE_FEATURES {
            assert!(CODE_FEATURES.contains(required));
        }
    }

    #[test]
    fn test_combine_either_source() {
        let mut code = FeatureSet::new();
        code.insert("caching", FeatureDetection::found("Redis sessions"));
        code.insert("has_cicd", FeatureDetection::absent());

        let mut directory = FeatureSet::new();
        directory.insert("has_cicd", FeatureDetection::found("matched `.github/workflows`"));
        directory.insert("caching", FeatureDetection::found("matched `redis`"));

        let combined = FeatureSet::combine(&code, &directory);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.get("caching").unwrap().details, "Redis sessions");
        assert!(combined.is_present("has_cicd"));
        assert_eq!(combined.get("has_cicd").unwrap().details, "matched `.github/workflows`");
    }

    #[test]
    fn test_present_iterates_in_name_order() {
        let set: FeatureSet = [
            ("storage".to_string(), FeatureDetection::found("S3")),
            ("caching".to_string(), FeatureDetection::found("Redis")),
            ("database".to_string(), FeatureDetection::absent()),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.present().collect::<Vec<_>>(), vec!["caching", "storage"]);
        assert!(!set.is_present("monolith"));
    }
}
