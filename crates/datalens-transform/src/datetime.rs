//! Datetime parsing for text columns.
//!
//! A column is parsed with a single format: the one that parses the most of
//! its values, earlier formats winning ties. Picking one format per column
//! keeps `01/02/2024` from meaning January in one row and February in the
//! next.
//!
//! Values carrying a UTC offset are converted to naive UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// One accepted datetime layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatetimeFormat {
    /// RFC 3339 / ISO 8601 with `Z` or a numeric offset.
    Rfc3339,
    /// A chrono pattern that includes an offset (`%z`, `%:z`).
    WithOffset(&'static str),
    /// A chrono pattern with date and time.
    DateTime(&'static str),
    /// A chrono pattern with a date only; parsed values are at midnight.
    Date(&'static str),
}

impl DatetimeFormat {
    /// Parses one trimmed value.
    pub fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        match self {
            Self::Rfc3339 => DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc()),
            Self::WithOffset(pattern) => DateTime::parse_from_str(value, pattern)
                .ok()
                .map(|dt| dt.naive_utc()),
            Self::DateTime(pattern) => NaiveDateTime::parse_from_str(value, pattern).ok(),
            Self::Date(pattern) => NaiveDate::parse_from_str(value, pattern)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN)),
        }
    }

    /// The chrono pattern, or `rfc3339`.
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::Rfc3339 => "rfc3339",
            Self::WithOffset(pattern) | Self::DateTime(pattern) | Self::Date(pattern) => pattern,
        }
    }
}

/// Accepted formats in tie-breaking order.
pub const DATETIME_FORMATS: &[DatetimeFormat] = &[
    DatetimeFormat::Rfc3339,
    DatetimeFormat::WithOffset("%Y-%m-%d %H:%M:%S%.f%:z"),
    DatetimeFormat::WithOffset("%Y-%m-%d %H:%M:%S%.f%z"),
    // ISO 8601 with T separator
    DatetimeFormat::DateTime("%Y-%m-%dT%H:%M:%S%.f"),
    DatetimeFormat::DateTime("%Y-%m-%dT%H:%M"),
    DatetimeFormat::DateTime("%Y-%m-%d %H:%M:%S%.f"),
    DatetimeFormat::DateTime("%Y-%m-%d %H:%M"),
    DatetimeFormat::DateTime("%Y/%m/%d %H:%M:%S"),
    DatetimeFormat::DateTime("%Y/%m/%d %H:%M"),
    DatetimeFormat::DateTime("%d-%b-%Y %H:%M:%S"), // 15-Jan-2024 10:30:00
    DatetimeFormat::DateTime("%d-%b-%Y %H:%M"),
    DatetimeFormat::DateTime("%d/%m/%Y %H:%M:%S"), // European
    DatetimeFormat::DateTime("%d/%m/%Y %H:%M"),
    DatetimeFormat::DateTime("%m/%d/%Y %H:%M:%S"), // US
    DatetimeFormat::DateTime("%m/%d/%Y %H:%M"),
    DatetimeFormat::Date("%Y-%m-%d"),
    DatetimeFormat::Date("%Y/%m/%d"),
    DatetimeFormat::Date("%Y年%m月%d日"),
    DatetimeFormat::Date("%d-%b-%Y"),  // 15-Jan-2024
    DatetimeFormat::Date("%d-%B-%Y"),  // 15-January-2024
    DatetimeFormat::Date("%d/%m/%Y"),  // European: 15/01/2024
    DatetimeFormat::Date("%m/%d/%Y"),  // US: 01/15/2024
    DatetimeFormat::Date("%d.%m.%Y"),  // German: 15.01.2024
    DatetimeFormat::Date("%Y%m%d"),    // Compact: 20240115
    DatetimeFormat::Date("%b %d, %Y"), // Jan 15, 2024
    DatetimeFormat::Date("%B %d, %Y"), // January 15, 2024
    DatetimeFormat::Date("%d %b %Y"),  // 15 Jan 2024
    DatetimeFormat::Date("%d %B %Y"),  // 15 January 2024
    DatetimeFormat::Date("%Y-%b-%d"),  // 2024-Jan-15
    DatetimeFormat::Date("%d-%m-%Y"),  // 15-01-2024
];

/// Parses a single value with the first format that accepts it.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| format.parse(trimmed))
}

/// Chooses the format that parses the most values.
///
/// Returns the format and how many values it parsed, or `None` if no format
/// parses anything.
pub fn best_format<'a, I>(values: I) -> Option<(DatetimeFormat, usize)>
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    let mut best: Option<(DatetimeFormat, usize)> = None;
    for format in DATETIME_FORMATS {
        let parsed = values
            .clone()
            .into_iter()
            .filter(|value| format.parse(value.trim()).is_some())
            .count();
        if parsed > 0 && best.is_none_or(|(_, count)| parsed > count) {
            best = Some((*format, parsed));
        }
    }
    best
}

/// Canonical text for a datetime: `%Y-%m-%dT%H:%M:%S`.
pub fn format_datetime(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}
