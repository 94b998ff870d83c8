//! Error types for the discovery engine

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Broad classification of an engine failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input log was unusable
    Validation,
    /// A referenced model does not exist
    NotFound,
    /// Anything else
    Internal,
}

/// Errors raised while importing, mining or aggregating
#[derive(Debug, Error)]
pub enum EngineError {
    /// The log could not be interpreted
    #[error("{0}")]
    InvalidLog(String),

    /// The log parsed but held no events
    #[error("event log contains no events")]
    EmptyLog,

    /// No stored model under this id
    #[error("Log {0} not found")]
    UnknownLog(String),

    /// Aggregation options were rejected
    #[error("{0}")]
    InvalidOptions(String),

    /// Reading the log file failed
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub fn invalid_log(message: impl Into<String>) -> Self {
        Self::InvalidLog(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLog(_)
            | Self::EmptyLog
            | Self::InvalidOptions(_)
            | Self::Csv(_)
            | Self::Json(_) => ErrorKind::Validation,
            Self::UnknownLog(_) => ErrorKind::NotFound,
            Self::Io { .. } => ErrorKind::Internal,
        }
    }
}
