//! Error types for frame construction and dataset keys.

use thiserror::Error;

/// Errors raised when a [`Frame`](crate::Frame) invariant would be broken.
#[derive(Debug, Error)]
pub enum FrameError {
    /// A column with this name already exists in the frame.
    #[error("duplicate column '{name}'")]
    DuplicateColumn { name: String },

    /// A column does not have the frame's row count.
    #[error("column '{name}' has {actual} rows, frame has {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Column not found in the frame.
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },

    /// Column metadata does not line up with the underlying data.
    #[error("column metadata does not match frame data: {reason}")]
    MetadataMismatch { reason: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for FrameError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Errors raised when parsing a dataset key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetKeyError {
    /// The key has no path component.
    #[error("dataset key is empty")]
    Empty,

    /// The format could not be derived from the key's extension.
    #[error("cannot determine dataset format for '{path}'")]
    UnknownFormat { path: String },
}
