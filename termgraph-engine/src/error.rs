//! Engine error types

use termgraph_core::CoreError;
use thiserror::Error;

/// Errors raised while loading, processing or writing documents
#[derive(Error, Debug)]
pub enum EngineError {
    /// Graph construction or pattern error
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// A view the operation needs is missing from the document
    #[error("document has no '{view}' view")]
    MissingView {
        /// The view id that was looked up
        view: String,
    },

    /// An annotation's offsets do not fit the document text
    #[error("annotation '{id}' has offsets {start}..{end} outside the text ({length} characters)")]
    InvalidOffsets {
        /// Annotation id
        id: String,
        /// Start offset
        start: usize,
        /// End offset
        end: usize,
        /// Text length in characters
        length: usize,
    },

    /// A line of a vector or list file could not be parsed
    #[error("malformed line {line}: {reason}")]
    MalformedLine {
        /// 1-based line number, 0 when unknown
        line: usize,
        /// What was wrong
        reason: String,
    },

    /// Parallel execution error
    #[cfg(feature = "parallel")]
    #[error("parallel execution failed: {0}")]
    ParallelError(String),

    /// Configuration error
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::JsonError(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(err: toml::ser::Error) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
