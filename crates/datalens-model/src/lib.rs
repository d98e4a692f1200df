//! Core data model for the datalens data layer.
//!
//! - [`Frame`]: an ordered set of typed columns backed by a Polars `DataFrame`
//! - [`ColumnKind`]: the closed set of semantic column types
//! - [`DatasetSummary`]: per-column aggregate statistics
//! - [`DatasetKey`]: an object-store path plus its format tag

mod dataset;
mod error;
mod frame;
mod kind;
mod summary;

pub use dataset::{DatasetFormat, DatasetKey};
pub use error::{DatasetKeyError, FrameError};
pub use frame::{
    CoercionWarning, ColumnMeta, ColumnRole, Frame, cadence_column_name, seconds_column_name,
};
pub use kind::ColumnKind;
pub use summary::{
    BooleanStats, ColumnStats, ColumnSummary, DatasetSummary, DatetimeStats, DurationStats,
    FrequencyStats, NumericStats, QuantileStat, SchemaField, Stat, ValueCount,
};
