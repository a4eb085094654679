//! Error types for the serializer boundary

use std::io;
use thiserror::Error;

/// Result type alias for serializer operations
pub type Result<T> = std::result::Result<T, SerializerError>;

/// Failures surfaced by parse and write operations.
///
/// Engine and stream errors are carried as the error source, unchanged.
#[derive(Error, Debug)]
pub enum SerializerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Malformed JSON input: {0}")]
    MalformedInput(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("JSON does not match the requested shape: {0}")]
    ShapeMismatch(#[source] serde_json::Error),

    #[error("JSON input nests deeper than the limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("Value cannot be serialized: {0}")]
    UnsupportedValue(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Output sink failed: {0}")]
    SinkFailure(#[source] io::Error),

    #[error("Input source failed: {0}")]
    SourceFailure(#[source] io::Error),
}

/// Payload-free discriminant of [`SerializerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    MalformedInput,
    ShapeMismatch,
    DepthLimitExceeded,
    UnsupportedValue,
    SinkFailure,
    SourceFailure,
}

impl SerializerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::ShapeMismatch(_) => ErrorKind::ShapeMismatch,
            Self::DepthLimitExceeded { .. } => ErrorKind::DepthLimitExceeded,
            Self::UnsupportedValue(_) => ErrorKind::UnsupportedValue,
            Self::SinkFailure(_) => ErrorKind::SinkFailure,
            Self::SourceFailure(_) => ErrorKind::SourceFailure,
        }
    }

    /// Classify a `serde_json` error raised while reading.
    pub(crate) fn from_read(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        match err.classify() {
            Category::Syntax | Category::Eof => Self::MalformedInput(Box::new(err)),
            Category::Data => Self::ShapeMismatch(err),
            Category::Io => Self::SourceFailure(io::Error::from(err)),
        }
    }

    /// Classify a `serde_json` error raised while writing.
    pub(crate) fn from_write(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::SinkFailure(io::Error::from(err))
        } else {
            Self::UnsupportedValue(Box::new(err))
        }
    }
}
