//! Dataset readers for datalens.
//!
//! Turns raw object bytes into a [`Frame`]:
//!
//! - **CSV**: encoding detection (BOM, strict UTF-8, statistical guess),
//!   delimiter sniffing, and an all-text frame where blank cells and null
//!   tokens are missing. Types are assigned later by the inferrer.
//! - **Parquet**: native columns mapped onto [`ColumnKind`]s; string columns
//!   are left as text for the inferrer.
//!
//! # Example
//!
//! ```ignore
//! use datalens_ingest::{CsvImportOptions, read_dataset};
//! use datalens_model::DatasetFormat;
//!
//! let frame = read_dataset(&bytes, DatasetFormat::Csv, &CsvImportOptions::default())?;
//! ```
//!
//! [`ColumnKind`]: datalens_model::ColumnKind

mod csv;
mod error;
mod parquet;

use datalens_model::{DatasetFormat, Frame};

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{
    CsvImportOptions, DEFAULT_SAMPLE_SIZE, DetectedEncoding, EncodingSource, decode_text,
    detect_encoding, encoding_for_label, read_csv, sniff_delimiter,
};

// === Parquet Reading ===
pub use parquet::read_parquet;

/// Reads a dataset of the given format.
///
/// # Errors
///
/// See [`read_csv`] and [`read_parquet`].
pub fn read_dataset(
    bytes: &[u8],
    format: DatasetFormat,
    csv_options: &CsvImportOptions,
) -> Result<Frame> {
    match format {
        DatasetFormat::Csv => read_csv(bytes, csv_options),
        DatasetFormat::Parquet => read_parquet(bytes),
    }
}
