//! Error types for vision operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for vision operations.
pub type VisionResult<T> = Result<T, VisionError>;

/// Errors that can occur while processing frames.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Undecodable frame: {0}")]
    Decode(String),

    #[error("Face detection failed: {0}")]
    Detection(String),

    #[error("Emotion classification failed: {0}")]
    Classification(String),

    #[error("Model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Backend unavailable: {0}")]
    Backend(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VisionError {
    /// Create a decode failure.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a detection failure.
    pub fn detection(message: impl Into<String>) -> Self {
        Self::Detection(message.into())
    }

    /// Create a classification failure.
    pub fn classification(message: impl Into<String>) -> Self {
        Self::Classification(message.into())
    }

    /// Create a backend configuration error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}
