//! CSV reading: encoding, dialect and table construction.

mod dialect;
mod encoding;
mod options;
mod reader;

pub use dialect::sniff_delimiter;
pub use encoding::{
    DetectedEncoding, EncodingSource, decode_text, detect_encoding, encoding_for_label,
};
pub use options::{CsvImportOptions, DEFAULT_SAMPLE_SIZE};
pub use reader::read_csv;
