//! Error types and utilities for Spotifire

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Spotifire operations
pub type Result<T> = std::result::Result<T, SpotifireError>;

/// Main error type for Spotifire operations
#[derive(Error, Debug)]
pub enum SpotifireError {
    /// An input row violates the producer contract (missing or malformed field)
    #[error("Invalid record: {message}")]
    InvalidRecord {
        /// What is wrong with the record
        message: String,
        /// Zero-based position of the offending row, when known
        row: Option<usize>,
        /// Name of the offending field, when known
        field: Option<String>,
    },

    /// A time window whose start lies after its end
    #[error("Invalid interval: start {start} is after end {end}")]
    InvalidInterval {
        /// Requested exclusive lower bound
        start: DateTime<Utc>,
        /// Requested inclusive upper bound
        end: DateTime<Utc>,
    },

    /// A well-formed request that matched no data
    #[error("No data: {message}")]
    EmptyResult {
        /// Which request came back empty
        message: String,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Reading or parsing a dataset failed
    #[error("Ingest error ({}): {message}", .path.display())]
    Ingest {
        /// Error message
        message: String,
        /// Dataset file or directory being read
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        /// Error message
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SpotifireError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new invalid record error
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: msg.into(),
            row: None,
            field: None,
        }
    }

    /// Create a new invalid record error pointing at a row and field
    pub fn invalid_field(msg: impl Into<String>, row: usize, field: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: msg.into(),
            row: Some(row),
            field: Some(field.into()),
        }
    }

    /// Create a new invalid interval error
    pub fn invalid_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::InvalidInterval { start, end }
    }

    /// Create a new empty result error
    pub fn empty_result(msg: impl Into<String>) -> Self {
        Self::EmptyResult {
            message: msg.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new ingest error for a dataset path
    pub fn ingest(msg: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Ingest {
            message: msg.into(),
            path: path.into(),
            source: None,
        }
    }

    /// Create a new ingest error with source
    pub fn ingest_with_source(
        msg: impl Into<String>,
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Ingest {
            message: msg.into(),
            path: path.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error reports a valid request that simply matched nothing
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult { .. })
    }

    /// Whether this error reports a malformed request or input row
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidRecord { .. } | Self::InvalidInterval { .. }
        )
    }

    /// Row number attached to an invalid record, if any
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::InvalidRecord { row, .. } => *row,
            _ => None,
        }
    }
}
