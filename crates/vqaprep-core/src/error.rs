//! Error types for the normalization pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised by the pipeline.
///
/// Configuration variants are fatal and surface before any image is touched.
/// Per-image variants (`Read`, `Transform`, `Write`) are caught by the runner
/// and turned into a [`crate::models::ProcessingResult`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input folder does not exist: {0}")]
    InputMissing(PathBuf),

    #[error("No eligible images (.jpg, .jpeg, .png) found in {0}")]
    NoImages(PathBuf),

    #[error("Failed to create output folder {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Output folder {path} is not writable: {reason}")]
    OutputUnwritable { path: PathBuf, reason: String },

    #[error("Invalid target size {height}x{width}: both dimensions must be positive")]
    InvalidTargetSize { height: u32, width: u32 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("{stage} failed: {reason}")]
    Transform { stage: &'static str, reason: String },

    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Destination already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub(crate) fn read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Read {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn transform(stage: &'static str, reason: impl ToString) -> Self {
        Self::Transform {
            stage,
            reason: reason.to_string(),
        }
    }
}
