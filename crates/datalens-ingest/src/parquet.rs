//! Parquet bytes to a typed [`Frame`].

use std::io::Cursor;

use datalens_common::cell_text;
use datalens_model::{ColumnKind, ColumnMeta, Frame};
use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Reads Parquet bytes using the embedded schema.
///
/// Integer columns become Int64, unless an unsigned value does not fit, in
/// which case the column is rendered to text. Floats become Float64, and
/// dates and datetimes microsecond Datetime. Timezone-aware values keep their UTC instant and
/// lose the zone. String columns stay text for the inferrer; any other type
/// is rendered to text.
///
/// # Errors
///
/// Returns [`IngestError::CorruptFile`] if the footer, schema or a row group
/// cannot be decoded.
pub fn read_parquet(bytes: &[u8]) -> Result<Frame> {
    if bytes.is_empty() {
        return Err(IngestError::EmptyInput { format: "Parquet" });
    }
    let df = ParquetReader::new(Cursor::new(bytes))
        .finish()
        .map_err(|err| IngestError::CorruptFile {
            format: "Parquet",
            message: err.to_string(),
        })?;

    let mut columns = Vec::with_capacity(df.width());
    let mut metas = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let (values, kind) = map_column(column)?;
        debug!(column = %column.name(), dtype = %column.dtype(), %kind, "Mapped Parquet column");
        metas.push(ColumnMeta::source(column.name().as_str(), kind));
        columns.push(values);
    }

    let df = DataFrame::new(columns)?;
    Ok(Frame::new(df, metas)?)
}

fn map_column(column: &Column) -> Result<(Column, ColumnKind)> {
    let mapped = match column.dtype() {
        DataType::Boolean => (column.clone(), ColumnKind::Boolean),
        DataType::String => (column.clone(), ColumnKind::Text),
        DataType::Date | DataType::Datetime(_, _) => (
            column.cast(&DataType::Datetime(TimeUnit::Microseconds, None))?,
            ColumnKind::Datetime,
        ),
        dtype if dtype.is_integer() => match column.strict_cast(&DataType::Int64) {
            Ok(ints) => (ints, ColumnKind::Integer),
            // Unsigned values past i64::MAX keep their exact digits as text.
            Err(err) => {
                debug!(column = %column.name(), %dtype, %err, "Integer column exceeds Int64");
                (render_text(column)?, ColumnKind::Text)
            }
        },
        dtype if dtype.is_float() => (column.cast(&DataType::Float64)?, ColumnKind::Float),
        _ => (render_text(column)?, ColumnKind::Text),
    };
    Ok(mapped)
}

fn render_text(column: &Column) -> Result<Column> {
    let values = (0..column.len())
        .map(|index| column.get(index).map(cell_text))
        .collect::<PolarsResult<Vec<Option<String>>>>()?;
    Ok(Series::new(column.name().clone(), values).into_column())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parquet_bytes(mut df: DataFrame) -> Vec<u8> {
        let mut buffer = Vec::new();
        ParquetWriter::new(&mut buffer).finish(&mut df).unwrap();
        buffer
    }

    #[test]
    fn test_native_types_map_to_kinds() {
        let date = Series::new("day".into(), &[19_000i32, 19_001])
            .cast(&DataType::Date)
            .unwrap()
            .into_column();
        let df = DataFrame::new(vec![
            Series::new("count".into(), &[1i32, 2]).into_column(),
            Series::new("ratio".into(), &[0.5f32, 1.5]).into_column(),
            Series::new("active".into(), &[true, false]).into_column(),
            Series::new("label".into(), &["a", "b"]).into_column(),
            date,
        ])
        .unwrap();

        let frame = read_parquet(&parquet_bytes(df)).unwrap();
        let kinds: Vec<ColumnKind> = frame.columns().iter().map(|meta| meta.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Integer,
                ColumnKind::Float,
                ColumnKind::Boolean,
                ColumnKind::Text,
                ColumnKind::Datetime,
            ]
        );
        assert_eq!(frame.column("count").unwrap().dtype(), &DataType::Int64);
        assert_eq!(frame.column("ratio").unwrap().dtype(), &DataType::Float64);
        assert_eq!(
            frame.column("day").unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Microseconds, None)
        );
    }

    #[test]
    fn test_nulls_survive() {
        let df = DataFrame::new(vec![
            Series::new("n".into(), &[Some(1i64), None, Some(3)]).into_column(),
        ])
        .unwrap();
        let frame = read_parquet(&parquet_bytes(df)).unwrap();
        assert_eq!(frame.column("n").unwrap().null_count(), 1);
        assert_eq!(frame.row_count(), 3);
    }

    #[test]
    fn test_unsigned_overflow_keeps_digits() {
        let df = DataFrame::new(vec![
            Series::new("id".into(), &[Some(7u64), None, Some(u64::MAX)]).into_column(),
            Series::new("small".into(), &[1u64, 2, 3]).into_column(),
        ])
        .unwrap();
        let frame = read_parquet(&parquet_bytes(df)).unwrap();

        assert_eq!(frame.meta("id").unwrap().kind, ColumnKind::Text);
        let ids: Vec<Option<&str>> = frame
            .column("id")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ids, vec![Some("7"), None, Some("18446744073709551615")]);

        assert_eq!(frame.meta("small").unwrap().kind, ColumnKind::Integer);
        assert_eq!(frame.column("small").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_corrupt_bytes() {
        let err = read_parquet(b"definitely not parquet").unwrap_err();
        assert!(matches!(err, IngestError::CorruptFile { .. }));
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_empty_bytes() {
        assert!(matches!(
            read_parquet(b""),
            Err(IngestError::EmptyInput { .. })
        ));
    }
}
