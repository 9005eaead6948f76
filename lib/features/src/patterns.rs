//! Directory listing pattern detection
//!
//! Case-insensitive substring matching of the repository's directory tree
//! against the path fragments in [`DIRECTORY_FEATURES`].

use crate::catalog::{FeatureDetection, FeatureSet, DIRECTORY_FEATURES};
use tracing::debug;

/// Detect infrastructure features from a rendered directory listing
///
/// Every directory feature appears in the result; the details of a present
/// feature name the first pattern that matched.
pub fn detect_directory_features(listing: &str) -> FeatureSet {
    let listing = listing.to_lowercase();

    DIRECTORY_FEATURES
        .iter()
        .map(|(feature, patterns)| {
            let detection = patterns
                .iter()
                .find(|pattern| listing.contains(&pattern.to_lowercase()))
                .map(|pattern| FeatureDetection::found(format!("matched `{pattern}`")))
                .unwrap_or_else(FeatureDetection::absent);
            debug!("{}: {}", feature, detection.present);
            (feature.to_string(), detection)
        })
        .collect()
}
