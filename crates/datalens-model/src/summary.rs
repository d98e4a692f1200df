//! Summary statistics types.
//!
//! Summaries never reference rows. Every statistic that can be undefined
//! (empty input, single-value standard deviation) is a [`Stat`], so a `NaN`
//! never reaches a caller.

use chrono::NaiveDateTime;
use datalens_common::format_hms;
use serde::{Deserialize, Serialize};

use crate::frame::{CoercionWarning, ColumnRole};
use crate::kind::ColumnKind;

/// A statistic that may be undefined. Serializes as a number or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Stat {
    Value(f64),
    #[default]
    Undefined,
}

impl Stat {
    /// Wraps a value, mapping non-finite results to `Undefined`.
    #[must_use]
    pub fn from_value(value: f64) -> Self {
        if value.is_finite() {
            Self::Value(value)
        } else {
            Self::Undefined
        }
    }

    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Undefined => None,
        }
    }

    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

impl From<Option<f64>> for Stat {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Undefined, Self::from_value)
    }
}

impl From<Stat> for Option<f64> {
    fn from(stat: Stat) -> Self {
        stat.value()
    }
}

/// A quantile and its interpolated value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantileStat {
    pub quantile: f64,
    pub value: Stat,
}

/// Aggregates over the non-missing values of a numeric column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NumericStats {
    /// Number of non-missing values.
    pub count: usize,
    pub mean: Stat,
    pub median: Stat,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: Stat,
    pub min: Stat,
    pub max: Stat,
    pub quantiles: Vec<QuantileStat>,
}

impl NumericStats {
    /// Looks up a computed quantile. `Undefined` if it was not requested.
    pub fn quantile(&self, quantile: f64) -> Stat {
        self.quantiles
            .iter()
            .find(|q| (q.quantile - quantile).abs() < f64::EPSILON)
            .map_or(Stat::Undefined, |q| q.value)
    }
}

/// Statistics for a duration column, computed from its seconds sibling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationStats {
    /// Name of the `_X_seconds` column the numbers come from.
    pub seconds_column: String,
    pub seconds: NumericStats,
}

impl DurationStats {
    /// The mean rendered as `HH:MM:SS`, if defined.
    pub fn mean_display(&self) -> Option<String> {
        self.seconds.mean.value().and_then(format_hms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatetimeStats {
    pub min: Option<NaiveDateTime>,
    pub max: Option<NaiveDateTime>,
    pub distinct_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BooleanStats {
    pub true_count: usize,
    pub false_count: usize,
}

/// A distinct value and its number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Value frequencies for categorical and text columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrequencyStats {
    pub distinct_count: usize,
    /// Most frequent values, descending by count, ties in first-seen order.
    pub top_values: Vec<ValueCount>,
}

/// Kind-specific statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnStats {
    Numeric(NumericStats),
    Duration(DurationStats),
    Datetime(DatetimeStats),
    Boolean(BooleanStats),
    Frequency(FrequencyStats),
}

impl ColumnStats {
    /// Numeric aggregates, for numeric and duration columns.
    pub fn numeric(&self) -> Option<&NumericStats> {
        match self {
            Self::Numeric(stats) => Some(stats),
            Self::Duration(stats) => Some(&stats.seconds),
            _ => None,
        }
    }
}

/// Summary of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub role: ColumnRole,
    pub row_count: usize,
    pub missing_count: usize,
    /// `missing_count / row_count`, `0.0` for an empty frame.
    pub missing_rate: f64,
    pub stats: ColumnStats,
    pub warning: Option<CoercionWarning>,
}

impl ColumnSummary {
    /// True if values were dropped during coercion or the missing rate
    /// exceeds `missing_threshold`.
    #[must_use]
    pub fn needs_caution(&self, missing_threshold: f64) -> bool {
        self.warning.is_some() || self.missing_rate > missing_threshold
    }
}

/// Schema entry for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub kind: ColumnKind,
    pub nullable: bool,
}

/// Summary of a whole dataset snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Display name, usually the dataset key.
    pub name: String,
    pub schema: Vec<SchemaField>,
    pub row_count: usize,
    pub column_count: usize,
    /// First rows rendered as text, in summarized column order.
    pub sample_rows: Vec<Vec<String>>,
    pub columns: Vec<ColumnSummary>,
}

impl DatasetSummary {
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|summary| summary.name == name)
    }

    /// Columns flagged by [`ColumnSummary::needs_caution`].
    pub fn cautions(&self, missing_threshold: f64) -> impl Iterator<Item = &ColumnSummary> {
        self.columns
            .iter()
            .filter(move |summary| summary.needs_caution(missing_threshold))
    }
}
