use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during mise core operations.
#[derive(Debug, Error)]
pub enum MiseError {
    /// The model artifact does not exist at the configured location.
    #[error("model artifact not found at {}", path.display())]
    ModelNotFound {
        /// Location that was searched.
        path: PathBuf,
    },

    /// The model could not be loaded. Cached by the model manager and
    /// reported again on every later call.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The model artifact was readable but its contents are inconsistent.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Tagging produced output that the pipeline cannot use.
    #[error("inference error: {0}")]
    Inference(String),

    /// Filesystem error while reading the model artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The model artifact is not valid JSON.
    #[error("model JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for mise operations.
pub type Result<T> = std::result::Result<T, MiseError>;
