//! Error types for dataset reading.

use datalens_model::FrameError;
use thiserror::Error;

/// Errors that can occur while turning bytes into a frame.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Encoding Errors ===
    /// The byte encoding could not be determined with confidence.
    #[error("could not detect text encoding: {reason}")]
    EncodingUndetected { reason: String },

    /// An explicitly requested encoding label is not known.
    #[error("unknown encoding label '{label}'")]
    UnknownEncoding { label: String },

    // === Parse Errors ===
    /// The input contains no records at all.
    #[error("{format} input is empty")]
    EmptyInput { format: &'static str },

    /// The CSV payload could not be parsed.
    #[error("failed to parse CSV at record {record}: {message}")]
    CsvParse { record: u64, message: String },

    /// Malformed Parquet footer, schema or row group.
    #[error("corrupt {format} file: {message}")]
    CorruptFile {
        format: &'static str,
        message: String,
    },

    /// An import option has an unusable value.
    #[error("invalid import option {option}: {reason}")]
    InvalidOption {
        option: &'static str,
        reason: String,
    },

    // === Frame Errors ===
    /// Failed to assemble the frame.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    /// Returns true for errors caused by the text encoding of the input.
    #[must_use]
    pub fn is_encoding(&self) -> bool {
        matches!(
            self,
            Self::EncodingUndetected { .. } | Self::UnknownEncoding { .. }
        )
    }

    /// Returns true for errors caused by malformed input data.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput { .. } | Self::CsvParse { .. } | Self::CorruptFile { .. }
        )
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
