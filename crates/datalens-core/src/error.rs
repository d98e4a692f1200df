//! The error taxonomy callers of the data layer see.

use std::fmt;

use datalens_ingest::IngestError;
use datalens_model::DatasetKeyError;
use datalens_store::StoreError;
use datalens_summary::SummaryError;
use datalens_transform::TransformError;
use serde::Serialize;
use thiserror::Error;

use crate::registry::RegistryError;
use crate::settings::SettingsError;

/// Coarse classification of a [`DataError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Access,
    /// Network or deadline failure; the request may be retried.
    Transient,
    Encoding,
    CorruptFile,
    TypeInference,
    /// Invalid settings, registry or dataset key.
    Config,
    /// Unexpected failure inside the pipeline.
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Access => "access",
            Self::Transient => "transient",
            Self::Encoding => "encoding",
            Self::CorruptFile => "corrupt_file",
            Self::TypeInference => "type_inference",
            Self::Config => "config",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Any failure of a data layer request.
#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    DatasetKey(#[from] DatasetKeyError),
}

impl DataError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(err) => match err {
                StoreError::NotFound { .. } => ErrorKind::NotFound,
                StoreError::Access { .. } => ErrorKind::Access,
                StoreError::Config(_) => ErrorKind::Config,
                err if err.is_transient() => ErrorKind::Transient,
                _ => ErrorKind::Internal,
            },
            Self::Ingest(err) if err.is_encoding() => ErrorKind::Encoding,
            Self::Ingest(err) if err.is_corrupt() => ErrorKind::CorruptFile,
            Self::Ingest(IngestError::InvalidOption { .. }) => ErrorKind::Config,
            Self::Ingest(_) => ErrorKind::Internal,
            Self::Transform(
                TransformError::MissingColumns { .. }
                | TransformError::EmptyFrame { .. }
                | TransformError::NotDatetime { .. },
            ) => ErrorKind::TypeInference,
            Self::Transform(_) => ErrorKind::Internal,
            Self::Summary(SummaryError::InvalidConfig { .. }) => ErrorKind::Config,
            Self::Summary(_) => ErrorKind::Internal,
            Self::Registry(err) if err.is_not_found() => ErrorKind::NotFound,
            Self::Registry(_) | Self::Settings(_) | Self::DatasetKey(_) => ErrorKind::Config,
        }
    }

    /// True only for transient failures.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}
