//! CSV bytes to an all-text [`Frame`].

use ::csv::ReaderBuilder;
use datalens_model::Frame;
use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

use super::dialect::sniff_delimiter;
use super::encoding::{decode_text, detect_encoding, encoding_for_label};
use super::options::CsvImportOptions;

/// Reads CSV bytes into a frame whose columns are all text.
///
/// Blank cells and configured null tokens are missing. Short rows are padded
/// with missing values, and rows longer than the header add `column_N`
/// columns. Header names are trimmed and made unique.
///
/// # Errors
///
/// - Encoding errors from detection or an unknown explicit label
/// - [`IngestError::EmptyInput`] when there is not a single record
/// - [`IngestError::CsvParse`] for malformed records
pub fn read_csv(bytes: &[u8], options: &CsvImportOptions) -> Result<Frame> {
    let detected = match options.encoding.as_deref() {
        Some(label) => encoding_for_label(label)?,
        None => detect_encoding(bytes, options.sample_size, options.tld_hint.as_deref())?,
    };
    let text = decode_text(bytes, &detected);

    let delimiter = match options.delimiter_byte()? {
        Some(delimiter) => delimiter,
        None => {
            let (sample, complete) = sample_prefix(&text, options.sample_size);
            sniff_delimiter(sample, complete)
        }
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header: Option<Vec<String>> = if options.has_header {
        match records.next() {
            Some(record) => Some(record.map_err(csv_error)?.iter().map(String::from).collect()),
            None => return Err(IngestError::EmptyInput { format: "CSV" }),
        }
    } else {
        None
    };

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for record in records {
        if options.max_rows.is_some_and(|max| rows.len() >= max) {
            break;
        }
        let record = record.map_err(csv_error)?;
        let row = record
            .iter()
            .map(|cell| (!options.is_null_token(cell.trim())).then(|| cell.to_string()))
            .collect();
        rows.push(row);
    }
    if header.is_none() && rows.is_empty() {
        return Err(IngestError::EmptyInput { format: "CSV" });
    }

    let header_width = header.as_ref().map_or(0, Vec::len);
    let width = rows.iter().map(Vec::len).fold(header_width, usize::max);
    let names = unique_names(header.unwrap_or_default(), width);

    let columns: Vec<Column> = names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let values: Vec<Option<String>> = rows
                .iter()
                .map(|row| row.get(index).cloned().flatten())
                .collect();
            Series::new(name.as_str().into(), values).into_column()
        })
        .collect();

    debug!(
        encoding = detected.name(),
        delimiter = %char::from(delimiter).escape_debug(),
        rows = rows.len(),
        columns = columns.len(),
        "Parsed CSV"
    );

    let df = DataFrame::new(columns)?;
    Ok(Frame::from_text(df)?)
}

/// Longest char-aligned prefix of at most `max_bytes`, and whether it is the
/// whole text.
fn sample_prefix(text: &str, max_bytes: usize) -> (&str, bool) {
    if text.len() <= max_bytes {
        return (text, true);
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    (&text[..end], false)
}

/// Trims header names, fills blanks with `column_N` and suffixes repeats
/// with `_2`, `_3`, ...; pads to `width` names.
fn unique_names(raw: Vec<String>, width: usize) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(width);
    for index in 0..width {
        let base = raw
            .get(index)
            .map(|name| name.trim_matches(|c: char| c == '\u{feff}' || c.is_whitespace()))
            .filter(|name| !name.is_empty())
            .map_or_else(|| format!("column_{}", index + 1), str::to_string);

        let mut candidate = base.clone();
        let mut suffix = 2;
        while names.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        names.push(candidate);
    }
    names
}

fn csv_error(err: ::csv::Error) -> IngestError {
    let record = err.position().map_or(0, |position| position.record());
    IngestError::CsvParse {
        record,
        message: err.to_string(),
    }
}
