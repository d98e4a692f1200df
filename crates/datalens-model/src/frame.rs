//! Typed frame representation.
//!
//! A [`Frame`] pairs a Polars `DataFrame` with one [`ColumnMeta`] per column.
//! Polars `null` is the explicit missing marker, so every column always has
//! exactly [`Frame::row_count`] entries.
//!
//! Derived columns (duration seconds, cadence buckets) are additive: they are
//! appended next to their source under a deterministic name and never replace
//! it.

use polars::prelude::{Column, DataFrame};
use serde::{Deserialize, Serialize};

use crate::error::FrameError;
use crate::kind::ColumnKind;

/// Name of the numeric seconds column derived from a duration column.
#[must_use]
pub fn seconds_column_name(source: &str) -> String {
    format!("_{source}_seconds")
}

/// Name of the week-bucket column derived from a datetime column.
#[must_use]
pub fn cadence_column_name(source: &str) -> String {
    format!("_{source}_week")
}

/// Non-fatal note that a column was promoted even though some values failed
/// coercion and were replaced by missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoercionWarning {
    /// Column the warning is attached to.
    pub column: String,
    /// Kind the column was promoted to.
    pub kind: ColumnKind,
    /// Number of non-missing values that failed coercion.
    pub dropped: usize,
    /// Number of non-missing values before coercion.
    pub total: usize,
    /// Up to three of the rejected raw values.
    pub examples: Vec<String>,
}

impl CoercionWarning {
    /// Fraction of non-missing values that were dropped.
    #[must_use]
    pub fn dropped_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.dropped as f64 / self.total as f64
        }
    }
}

/// How a column came to be in the frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ColumnRole {
    /// Read from the dataset.
    Source,
    /// Total seconds derived from a duration column.
    DurationSeconds { source: String },
    /// Monday-start week bucket derived from a datetime column.
    Cadence { source: String },
}

impl ColumnRole {
    /// Derived helper columns are hidden from summaries by default.
    #[must_use]
    pub const fn is_helper(&self) -> bool {
        !matches!(self, Self::Source)
    }

    /// The column this one was derived from, if any.
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Source => None,
            Self::DurationSeconds { source } | Self::Cadence { source } => Some(source),
        }
    }
}

/// Metadata describing one frame column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    pub kind: ColumnKind,
    pub role: ColumnRole,
    pub warning: Option<CoercionWarning>,
}

impl ColumnMeta {
    /// Metadata for a column read from the dataset.
    pub fn source(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            role: ColumnRole::Source,
            warning: None,
        }
    }

    /// Metadata for a derived helper column.
    pub fn derived(name: impl Into<String>, kind: ColumnKind, role: ColumnRole) -> Self {
        Self {
            name: name.into(),
            kind,
            role,
            warning: None,
        }
    }
}

/// Ordered collection of typed columns sharing one row count.
#[derive(Debug, Clone)]
pub struct Frame {
    data: DataFrame,
    columns: Vec<ColumnMeta>,
}

impl Frame {
    /// Builds a frame, checking that metadata lines up with the data.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::MetadataMismatch`] if the column count or any
    /// column name differs between `data` and `columns`.
    pub fn new(data: DataFrame, columns: Vec<ColumnMeta>) -> Result<Self, FrameError> {
        if data.width() != columns.len() {
            return Err(FrameError::MetadataMismatch {
                reason: format!(
                    "{} data columns, {} metadata entries",
                    data.width(),
                    columns.len()
                ),
            });
        }
        for (column, meta) in data.get_columns().iter().zip(&columns) {
            if column.name().as_str() != meta.name {
                return Err(FrameError::MetadataMismatch {
                    reason: format!("expected '{}', found '{}'", meta.name, column.name()),
                });
            }
        }
        Ok(Self { data, columns })
    }

    /// Wraps a freshly read frame, tagging every column as `Text`.
    ///
    /// # Errors
    ///
    /// Never fails for a valid `DataFrame`; the signature mirrors [`Frame::new`].
    pub fn from_text(data: DataFrame) -> Result<Self, FrameError> {
        let columns = data
            .get_columns()
            .iter()
            .map(|column| ColumnMeta::source(column.name().as_str(), ColumnKind::Text))
            .collect();
        Self::new(data, columns)
    }

    pub fn row_count(&self) -> usize {
        self.data.height()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn meta(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|meta| meta.name == name)
    }

    /// Values of the named column.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ColumnNotFound`] for unknown names.
    pub fn column(&self, name: &str) -> Result<&Column, FrameError> {
        self.data
            .column(name)
            .map_err(|_| FrameError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Iterates metadata and values in frame order.
    pub fn iter(&self) -> impl Iterator<Item = (&ColumnMeta, &Column)> {
        self.columns.iter().zip(self.data.get_columns())
    }

    /// Replaces the values of an existing column and updates its kind and warning.
    ///
    /// The replacement keeps the column's position, name and role.
    ///
    /// # Errors
    ///
    /// Fails if the column is unknown or the new values have a different length.
    pub fn replace_column(
        &mut self,
        column: Column,
        kind: ColumnKind,
        warning: Option<CoercionWarning>,
    ) -> Result<(), FrameError> {
        let name = column.name().to_string();
        let Some(index) = self.columns.iter().position(|meta| meta.name == name) else {
            return Err(FrameError::ColumnNotFound { name });
        };
        self.check_length(&name, column.len())?;
        self.data.with_column(column)?;
        if let Some(meta) = self.columns.get_mut(index) {
            meta.kind = kind;
            meta.warning = warning;
        }
        Ok(())
    }

    /// Appends a derived column at the end of the frame.
    ///
    /// # Errors
    ///
    /// Fails if the name is already taken, does not match `meta.name`, or the
    /// column length differs from the frame's row count.
    pub fn push_derived(&mut self, meta: ColumnMeta, column: Column) -> Result<(), FrameError> {
        if column.name().as_str() != meta.name {
            return Err(FrameError::MetadataMismatch {
                reason: format!("expected '{}', found '{}'", meta.name, column.name()),
            });
        }
        if self.meta(&meta.name).is_some() {
            return Err(FrameError::DuplicateColumn { name: meta.name });
        }
        if !self.columns.is_empty() {
            self.check_length(&meta.name, column.len())?;
        }
        self.data.with_column(column)?;
        self.columns.push(meta);
        Ok(())
    }

    /// Returns a frame holding at most the first `rows` rows.
    #[must_use]
    pub fn head(&self, rows: usize) -> Self {
        Self {
            data: self.data.head(Some(rows)),
            columns: self.columns.clone(),
        }
    }

    fn check_length(&self, name: &str, actual: usize) -> Result<(), FrameError> {
        let expected = self.row_count();
        if actual != expected {
            return Err(FrameError::LengthMismatch {
                name: name.to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn text_frame() -> Frame {
        let df = df! {
            "a" => &[Some("1"), None, Some("3")],
            "b" => &["x", "y", "z"],
        }
        .unwrap();
        Frame::from_text(df).unwrap()
    }

    #[test]
    fn test_from_text_tags_every_column() {
        let frame = text_frame();
        assert_eq!(frame.row_count(), 3);
        assert_eq!(frame.width(), 2);
        assert!(
            frame
                .columns()
                .iter()
                .all(|meta| meta.kind == ColumnKind::Text && meta.role == ColumnRole::Source)
        );
    }

    #[test]
    fn test_new_rejects_mismatched_metadata() {
        let df = df! { "a" => &[1i64, 2] }.unwrap();
        let result = Frame::new(df, vec![ColumnMeta::source("b", ColumnKind::Integer)]);
        assert!(matches!(result, Err(FrameError::MetadataMismatch { .. })));
    }

    #[test]
    fn test_replace_column_keeps_position() {
        let mut frame = text_frame();
        let ints = Series::new("a".into(), &[Some(1i64), None, Some(3)]).into_column();
        frame
            .replace_column(ints, ColumnKind::Integer, None)
            .unwrap();

        assert_eq!(frame.columns()[0].name, "a");
        assert_eq!(frame.columns()[0].kind, ColumnKind::Integer);
        assert_eq!(frame.column("a").unwrap().dtype(), &DataType::Int64);
        assert_eq!(frame.column("a").unwrap().null_count(), 1);
    }

    #[test]
    fn test_push_derived_rejects_duplicates_and_length() {
        let mut frame = text_frame();
        let meta = ColumnMeta::derived(
            "_a_seconds",
            ColumnKind::Float,
            ColumnRole::DurationSeconds {
                source: "a".to_string(),
            },
        );
        let short = Series::new("_a_seconds".into(), &[1.0f64]).into_column();
        assert!(matches!(
            frame.push_derived(meta.clone(), short),
            Err(FrameError::LengthMismatch { .. })
        ));

        let full = Series::new("_a_seconds".into(), &[1.0f64, 2.0, 3.0]).into_column();
        frame.push_derived(meta.clone(), full.clone()).unwrap();
        assert_eq!(frame.width(), 3);
        assert!(frame.columns()[2].role.is_helper());

        assert!(matches!(
            frame.push_derived(meta, full),
            Err(FrameError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn test_derived_names() {
        assert_eq!(seconds_column_name("video_duration"), "_video_duration_seconds");
        assert_eq!(cadence_column_name("Date"), "_Date_week");
    }
}
