// Component error taxonomy.
//
// Each stage of the request pipeline owns one error enum. None of them know
// about HTTP: the translation to status codes happens once, in
// `errors::AppError`.

use std::path::PathBuf;

/// Failure to turn a file on disk into a `ModelArtifact`.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Model file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Model file {} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Failed to read model file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        LoadError::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Request payload does not match the loaded model's feature schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Feature schema mismatch: expected {expected:?}, received {received:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        received: Vec<String>,
    },

    #[error("Batch must contain at least one record")]
    EmptyBatch,

    #[error("Feature '{feature}' {reason}")]
    InvalidValue { feature: String, reason: String },

    #[error("Record {index}: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

/// Failure while running the predictor itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("Shape mismatch: expected {expected_cols} columns and at least one row, got {rows}x{cols}")]
    ShapeMismatch {
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Predictor failure: {0}")]
    EngineFailure(String),
}

/// Outcome of a failed `ModelLifecycleManager::reload`.
#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error("Reload already in progress")]
    InProgress,

    #[error(transparent)]
    Load(#[from] LoadError),
}
