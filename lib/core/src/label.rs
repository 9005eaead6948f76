//! Label encoding for deployment-type tags
//!
//! Classes are sorted lexicographically and numbered from zero. The codes are
//! for reporting only; they never enter the feature space.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit on every label in the dataset, duplicates included
    pub fn fit<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut classes: Vec<String> = labels.into_iter().map(str::to_string).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .ok()
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.encode(label).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_sorted_and_unique() {
        let encoder = LabelEncoder::fit(["Heroku", "AWS", "Heroku", "Monolith-on-VM", "AWS"]);
        assert_eq!(encoder.classes(), &["AWS", "Heroku", "Monolith-on-VM"]);
        assert_eq!(encoder.len(), 3);
    }

    #[test]
    fn test_encode_decode() {
        let encoder = LabelEncoder::fit(["Heroku", "AWS"]);
        assert_eq!(encoder.encode("AWS"), Some(0));
        assert_eq!(encoder.encode("Heroku"), Some(1));
        assert_eq!(encoder.encode("GCP"), None);
        assert_eq!(encoder.decode(1), Some("Heroku"));
        assert_eq!(encoder.decode(2), None);
    }
}
