//! Typing and derived columns for datalens frames.
//!
//! Operations run on a [`Frame`] in this order:
//!
//! 1. [`infer_frame`]: assigns a [`ColumnKind`] to each text column and
//!    coerces its values
//! 2. [`normalize_durations`]: adds `_X_seconds` for duration columns
//! 3. [`build_cadence_columns`]: adds `_X_week` Monday buckets for datetime
//!    columns
//!
//! Each step only appends or retypes columns, and rerunning a step on its own
//! output changes nothing.
//!
//! # Example
//!
//! ```ignore
//! use datalens_transform::{CadenceConfig, InferenceConfig, build_cadence_columns, infer_frame, normalize_durations};
//!
//! let warnings = infer_frame(&mut frame, &InferenceConfig::default())?;
//! normalize_durations(&mut frame)?;
//! build_cadence_columns(&mut frame, &CadenceConfig::default())?;
//! ```
//!
//! [`Frame`]: datalens_model::Frame
//! [`ColumnKind`]: datalens_model::ColumnKind

mod cadence;
mod datetime;
mod duration;
mod error;
mod inference;

// Error type
pub use error::{Result, TransformError};

// Inference
pub use inference::{InferenceConfig, canonical_text, infer_frame};

// Datetime parsing
pub use datetime::{DATETIME_FORMATS, DatetimeFormat, best_format, format_datetime, parse_datetime};

// Derived columns
pub use cadence::{CadenceConfig, build_cadence_columns, week_start};
pub use duration::{normalize_durations, parse_duration_seconds};
