//! Core error types for the Inkboard engine.

use std::path::PathBuf;

/// A specialized Result type for Inkboard operations.
pub type InkboardResult<T> = Result<T, InkboardError>;

/// Top-level error type encompassing all Inkboard subsystems.
#[derive(Debug, thiserror::Error)]
pub enum InkboardError {
    #[error("render error: {0}")]
    Render(String),

    #[error("asset error: {message} ({path:?})")]
    Asset { message: String, path: PathBuf },

    #[error("encode error: {0}")]
    Encode(String),

    #[error("validation error: {0}")]
    Validation(String),

    /// A scene was exported without an explicit camera but has no
    /// camera flagged as default. Fatal for that export call.
    #[error("no default camera found in scene '{0}'")]
    MissingDefaultCamera(String),

    #[error("unsupported feature: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InkboardError {
    /// Create an asset error.
    pub fn asset(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        InkboardError::Asset {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a render error.
    pub fn render(message: impl Into<String>) -> Self {
        InkboardError::Render(message.into())
    }
}
