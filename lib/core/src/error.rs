use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Invalid value {value:?} in column '{column}' at row {row}")]
    DataFormat {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Invalid neighbor count k={k}: must satisfy 0 < k <= {max}")]
    InvalidK { k: usize, max: usize },

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Repository listed more than once: {0}")]
    DuplicateRepository(String),

    #[error("Non-finite value for feature '{feature}'")]
    NonFiniteValue { feature: String },

    #[error("Feature '{0}' missing from detected features")]
    MissingFeature(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
