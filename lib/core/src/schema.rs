//! Feature schema
//!
//! The ordered list of feature names that gives every vector position its
//! meaning. It is fixed once, from the reference dataset's column order, and
//! then handed to everything that produces or consumes feature vectors.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Minimum number of feature columns a schema must carry
pub const MIN_FEATURES: usize = 2;

/// Ordered feature names defining vector positions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Create a schema from ordered feature names
    ///
    /// Rejects schemas with fewer than [`MIN_FEATURES`] names and schemas
    /// that name the same feature twice.
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.len() < MIN_FEATURES {
            return Err(Error::Schema(format!(
                "expected at least {MIN_FEATURES} feature columns, found {}",
                names.len()
            )));
        }

        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(Error::Schema(format!("feature column '{name}' appears twice")));
            }
        }

        Ok(Self { names })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of a feature in the vector
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Check that a vector of `len` values fits this schema
    pub fn check_dimension(&self, len: usize) -> Result<()> {
        if len != self.names.len() {
            return Err(Error::InvalidDimension {
                expected: self.names.len(),
                actual: len,
            });
        }
        Ok(())
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = Error;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::new(names)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.names
    }
}
