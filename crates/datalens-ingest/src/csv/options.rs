//! CSV import options.

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Bytes inspected for encoding detection and delimiter sniffing.
pub const DEFAULT_SAMPLE_SIZE: usize = 10 * 1024;

/// Options controlling how CSV bytes are decoded and split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvImportOptions {
    /// Encoding label (`utf-8`, `shift_jis`, `windows-1252`, ...). Skips
    /// detection when set.
    pub encoding: Option<String>,
    /// Field delimiter. Skips sniffing when set.
    pub delimiter: Option<char>,
    /// Whether the first record holds column names.
    pub has_header: bool,
    /// Cell values (after trimming) treated as missing, in addition to blanks.
    pub null_values: Vec<String>,
    /// Stop after this many data rows.
    pub max_rows: Option<usize>,
    /// Prefix length used for detection and sniffing.
    pub sample_size: usize,
    /// Top-level domain hint for the encoding detector (`jp`, `de`, ...).
    pub tld_hint: Option<String>,
}

impl Default for CsvImportOptions {
    fn default() -> Self {
        Self {
            encoding: None,
            delimiter: None,
            has_header: true,
            null_values: ["NA", "N/A", "n/a", "NULL", "null", "NaN", "nan", "#N/A", "<NA>"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_rows: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
            tld_hint: None,
        }
    }
}

impl CsvImportOptions {
    /// The configured delimiter as a byte, if any.
    ///
    /// # Errors
    ///
    /// Fails for non-ASCII delimiters, which the CSV parser cannot split on.
    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        self.delimiter
            .map(|delimiter| {
                u8::try_from(delimiter)
                    .ok()
                    .filter(u8::is_ascii)
                    .ok_or_else(|| IngestError::InvalidOption {
                        option: "delimiter",
                        reason: format!("'{delimiter}' is not an ASCII character"),
                    })
            })
            .transpose()
    }

    pub(crate) fn is_null_token(&self, trimmed: &str) -> bool {
        trimmed.is_empty() || self.null_values.iter().any(|token| token == trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CsvImportOptions::default();
        assert!(options.has_header);
        assert_eq!(options.sample_size, 10 * 1024);
        assert!(options.is_null_token(""));
        assert!(options.is_null_token("NA"));
        assert!(!options.is_null_token("0"));
    }

    #[test]
    fn test_delimiter_byte() {
        let options = CsvImportOptions {
            delimiter: Some(';'),
            ..CsvImportOptions::default()
        };
        assert_eq!(options.delimiter_byte().unwrap(), Some(b';'));

        let options = CsvImportOptions {
            delimiter: Some('、'),
            ..CsvImportOptions::default()
        };
        assert!(matches!(
            options.delimiter_byte(),
            Err(IngestError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_deserialize_partial() {
        let options: CsvImportOptions = toml::from_str(
            r#"
            encoding = "shift_jis"
            delimiter = "\t"
            "#,
        )
        .unwrap();
        assert_eq!(options.encoding.as_deref(), Some("shift_jis"));
        assert_eq!(options.delimiter, Some('\t'));
        assert!(options.has_header);
    }
}
