//! Error types for frame transformations.

use datalens_model::FrameError;
use thiserror::Error;

/// Errors that can occur while typing or deriving columns.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Columns the caller requires are not in the frame.
    #[error("required columns missing: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// Columns were required but the frame has no rows to type them from.
    #[error("cannot infer types for required columns of an empty frame: {}", columns.join(", "))]
    EmptyFrame { columns: Vec<String> },

    /// A cadence source column is not a datetime column.
    #[error("column '{column}' is {kind}, expected datetime")]
    NotDatetime { column: String, kind: String },

    /// Frame invariant violation.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_display() {
        let err = TransformError::MissingColumns {
            columns: vec!["region".to_string(), "amount".to_string()],
        };
        assert_eq!(err.to_string(), "required columns missing: region, amount");
    }
}
