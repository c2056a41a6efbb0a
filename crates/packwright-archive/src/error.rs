//! Error types for packwright-archive

use thiserror::Error;

/// Result type alias using packwright-archive's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Archive builder error types
#[derive(Error, Debug)]
pub enum Error {
    /// The same path was added twice in one build session
    #[error("Duplicate archive path: {path}")]
    DuplicatePath { path: String },

    /// `add` or `finish` was called after `finish`
    #[error("Archive builder is closed: finish() was already called")]
    BuilderClosed,

    /// Entry path is not a relative, forward-slash path
    #[error("Invalid archive path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// ZIP encoder failure
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a duplicate path error
    pub fn duplicate_path(path: impl Into<String>) -> Self {
        Self::DuplicatePath { path: path.into() }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
