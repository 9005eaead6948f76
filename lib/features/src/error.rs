use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Malformed classifier response: {0}")]
    MalformedResponse(String),

    #[error("Classifier response is missing required feature '{0}'")]
    MissingFeature(String),

    #[error("Classifier response has no boolean 'present' for feature '{0}'")]
    InvalidFeature(String),

    #[error("Classifier failed: {0}")]
    Classifier(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] deploycast_core::Error),
}
