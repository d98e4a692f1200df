//! Conversions between Polars temporal columns and chrono values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::*;

/// Reads a Date or Datetime column as naive datetimes (UTC instant for
/// timezone-aware data).
///
/// # Errors
///
/// Fails if the column cannot be cast to a microsecond datetime.
pub fn column_datetimes(column: &Column) -> PolarsResult<Vec<Option<NaiveDateTime>>> {
    let micros = column
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
        .cast(&DataType::Int64)?;
    Ok(micros
        .i64()?
        .into_iter()
        .map(|value| value.and_then(datetime_from_micros))
        .collect())
}

/// Builds a microsecond Datetime column from naive datetimes.
///
/// # Errors
///
/// Fails if Polars rejects the cast.
pub fn datetime_column(name: &str, values: &[Option<NaiveDateTime>]) -> PolarsResult<Column> {
    let micros: Vec<Option<i64>> = values
        .iter()
        .map(|value| value.map(|dt| dt.and_utc().timestamp_micros()))
        .collect();
    Ok(Series::new(name.into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?
        .into_column())
}

/// Builds a Date column from naive dates.
///
/// # Errors
///
/// Fails if Polars rejects the cast.
pub fn date_column(name: &str, values: &[Option<NaiveDate>]) -> PolarsResult<Column> {
    let epoch = DateTime::<Utc>::UNIX_EPOCH.date_naive();
    let days: Vec<Option<i32>> = values
        .iter()
        .map(|value| value.and_then(|date| i32::try_from((date - epoch).num_days()).ok()))
        .collect();
    Ok(Series::new(name.into(), days)
        .cast(&DataType::Date)?
        .into_column())
}

/// Converts microseconds since the Unix epoch to a naive datetime.
pub fn datetime_from_micros(micros: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_micros(micros).map(|dt| dt.naive_utc())
}
