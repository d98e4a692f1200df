//! Dataset identity: store path and format tag.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DatasetKeyError;

/// On-store file format of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetFormat {
    Csv,
    Parquet,
}

impl DatasetFormat {
    /// Derives the format from a path's extension (case-insensitive).
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, ext) = path.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "tsv" | "txt" => Some(Self::Csv),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

impl fmt::Display for DatasetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Location of a dataset inside the configured bucket.
///
/// The bucket itself comes from the store configuration; the key only carries
/// the object path and how to read it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetKey {
    path: String,
    format: DatasetFormat,
}

impl DatasetKey {
    /// Parses a key, deriving the format from its extension.
    ///
    /// A leading `/` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty or has no known extension.
    pub fn parse(path: &str) -> Result<Self, DatasetKeyError> {
        let path = normalize_path(path)?;
        let format = DatasetFormat::from_path(&path)
            .ok_or_else(|| DatasetKeyError::UnknownFormat { path: path.clone() })?;
        Ok(Self { path, format })
    }

    /// Builds a key with an explicit format, regardless of extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty.
    pub fn with_format(path: &str, format: DatasetFormat) -> Result<Self, DatasetKeyError> {
        Ok(Self {
            path: normalize_path(path)?,
            format,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn format(&self) -> DatasetFormat {
        self.format
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

fn normalize_path(path: &str) -> Result<String, DatasetKeyError> {
    let trimmed = path.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(DatasetKeyError::Empty);
    }
    Ok(trimmed.to_string())
}
