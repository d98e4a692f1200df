//! `HH:MM:SS` duration text to total seconds.
//!
//! Accepted shapes: `HH:MM:SS`, `H:MM:SS` and `MM:SS`. Components are summed
//! literally (`00:75:00` is 4500 seconds, `-01:30:00` is -1800), only the
//! leading component may be negative, and seconds may carry a fraction.
//! Anything else is missing, including totals that overflow `i64` seconds.
//!
//! The seconds live in a sibling `_X_seconds` column; the source text column
//! is never modified.

use datalens_model::{ColumnKind, ColumnMeta, ColumnRole, Frame, seconds_column_name};
use polars::prelude::*;
use tracing::debug;

use crate::error::Result;

/// Parses duration text into total seconds.
///
/// # Examples
///
/// ```
/// use datalens_transform::parse_duration_seconds;
///
/// assert_eq!(parse_duration_seconds("02:15:30"), Some(8130.0));
/// assert_eq!(parse_duration_seconds("05:30"), Some(330.0));
/// assert_eq!(parse_duration_seconds("invalid"), None);
/// ```
pub fn parse_duration_seconds(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parts: Vec<&str> = trimmed.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [hours, minutes, seconds] => (
            parse_component(hours, true)?,
            parse_component(minutes, false)?,
            *seconds,
        ),
        [minutes, seconds] => (0, parse_component(minutes, true)?, *seconds),
        _ => return None,
    };
    let seconds = parse_seconds(seconds)?;
    let whole = hours.checked_mul(3600)?.checked_add(minutes.checked_mul(60)?)?;
    Some(whole as f64 + seconds)
}

/// Whole-number component; only the leading one may carry a `-`.
fn parse_component(value: &str, leading: bool) -> Option<i64> {
    let digits = match value.strip_prefix('-') {
        Some(rest) if leading => rest,
        Some(_) => return None,
        None => value,
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude: i64 = digits.parse().ok()?;
    Some(if value.starts_with('-') { -magnitude } else { magnitude })
}

/// Seconds with an optional fraction: `SS` or `SS.fff`.
fn parse_seconds(value: &str) -> Option<f64> {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    let digits_ok = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !digits_ok(whole) || !digits_ok(fraction) {
        return None;
    }
    if value.ends_with('.') {
        return None;
    }
    value.parse().ok()
}

/// Appends a `_X_seconds` column for every source column of kind
/// [`ColumnKind::Duration`].
///
/// Columns that already have their seconds sibling are skipped, so running
/// this twice changes nothing.
///
/// # Errors
///
/// Fails if a derived name collides with an unrelated column.
pub fn normalize_durations(frame: &mut Frame) -> Result<usize> {
    let sources: Vec<String> = frame
        .columns()
        .iter()
        .filter(|meta| meta.kind == ColumnKind::Duration && meta.role == ColumnRole::Source)
        .map(|meta| meta.name.clone())
        .collect();

    let mut added = 0;
    for source in sources {
        let target = seconds_column_name(&source);
        if frame
            .meta(&target)
            .is_some_and(|meta| meta.role.source() == Some(source.as_str()))
        {
            continue;
        }
        let seconds = seconds_for(frame.column(&source)?, &target)?;
        debug!(
            column = %source,
            derived = %target,
            missing = seconds.null_count(),
            "Derived duration seconds"
        );
        let meta = ColumnMeta::derived(
            target,
            ColumnKind::Float,
            ColumnRole::DurationSeconds { source },
        );
        frame.push_derived(meta, seconds)?;
        added += 1;
    }
    Ok(added)
}

fn seconds_for(column: &Column, name: &str) -> Result<Column> {
    let values: Vec<Option<f64>> = column
        .str()?
        .into_iter()
        .map(|value| value.and_then(parse_duration_seconds))
        .collect();
    Ok(Series::new(name.into(), values).into_column())
}
