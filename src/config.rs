//! Runtime configuration
//!
//! Values come from three layers, later ones winning: built-in defaults, an
//! optional TOML file, then command-line flags.
//!
//! ```toml
//! dataset = "data/dataset.csv"
//! k = 5
//! chunk_size = 12000
//! skip_extensions = [".css", ".map", ".svg"]
//! log_level = "info"
//!
//! [columns]
//! id_column = "repository"
//! label_column = "deployment"
//! ```

use deploycast_core::DatasetOptions;
use deploycast_features::{AnalyzerOptions, DEFAULT_CHUNK_SIZE, DEFAULT_SKIP_EXTENSIONS};
use deploycast_similarity::DEFAULT_K;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATASET_PATH: &str = "dataset.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeploycastConfig {
    /// Reference dataset CSV
    pub dataset: PathBuf,
    pub columns: DatasetOptions,
    /// Neighbors polled per prediction
    pub k: usize,
    pub chunk_size: usize,
    pub skip_extensions: Vec<String>,
    pub log_level: String,
}

impl Default for DeploycastConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from(DEFAULT_DATASET_PATH),
            columns: DatasetOptions::default(),
            k: DEFAULT_K,
            chunk_size: DEFAULT_CHUNK_SIZE,
            skip_extensions: DEFAULT_SKIP_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            log_level: "info".to_string(),
        }
    }
}

impl DeploycastConfig {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read a config file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, or the file at `path` when one is given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k == 0 {
            return Err(ConfigError::Invalid("k must be at least 1".to_string()));
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid("chunk_size must be at least 1".to_string()));
        }
        if self.columns.id_column == self.columns.label_column {
            return Err(ConfigError::Invalid(format!(
                "id and label columns are both '{}'",
                self.columns.id_column
            )));
        }
        Ok(())
    }

    pub fn analyzer_options(&self) -> AnalyzerOptions {
        AnalyzerOptions {
            chunk_size: self.chunk_size,
            skip_extensions: self.skip_extensions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DeploycastConfig::default();
        assert_eq!(config.k, 5);
        assert_eq!(config.chunk_size, 12_000);
        assert_eq!(config.columns.label_column, "deployment");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = DeploycastConfig::from_toml(
            r#"
            k = 3
            [columns]
            label_column = "target"
            "#,
        )
        .unwrap();
        assert_eq!(config.k, 3);
        assert_eq!(config.columns.label_column, "target");
        assert_eq!(config.columns.id_column, "repository");
        assert_eq!(config.dataset, PathBuf::from(DEFAULT_DATASET_PATH));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(DeploycastConfig::from_toml("neighbours = 3").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dataset = \"/srv/repos.csv\"\nchunk_size = 4000").unwrap();

        let config = DeploycastConfig::load(file.path()).unwrap();
        assert_eq!(config.dataset, PathBuf::from("/srv/repos.csv"));
        assert_eq!(config.analyzer_options().chunk_size, 4000);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "k = 0").unwrap();
        assert!(matches!(
            DeploycastConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            DeploycastConfig::load(Path::new("/nonexistent/deploycast.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
