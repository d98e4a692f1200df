//! Error types for summarization.

use datalens_model::FrameError;
use thiserror::Error;

/// Errors that can occur while summarizing a frame.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// A duration column has no `_X_seconds` sibling to read from.
    #[error("duration column '{column}' has no seconds column '{helper}'")]
    MissingHelper { column: String, helper: String },

    /// A summary option is out of range.
    #[error("invalid summary option '{option}': {reason}")]
    InvalidConfig { option: &'static str, reason: String },

    /// Frame invariant violation.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for SummaryError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for summary operations.
pub type Result<T> = std::result::Result<T, SummaryError>;
