//! Error types for extraction and host capabilities

use thiserror::Error;

/// Result type for host capability calls
pub type HostResult<T> = Result<T, HostError>;

/// Result type for the extraction sequence
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors raised by host capabilities (file persistence, metadata, panes, selection)
#[derive(Debug, Error)]
pub enum HostError {
    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors returned by `NoteExtractor::extract`
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The selection has no derivable title, so the action is not offered
    #[error("Extraction unavailable: selection has no usable title")]
    Unavailable,

    #[error(transparent)]
    Host(#[from] HostError),
}

impl ExtractError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ExtractError::Unavailable)
    }
}
