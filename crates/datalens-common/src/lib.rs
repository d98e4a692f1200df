//! Shared helpers for datalens crates.
//!
//! - [`cell_text`], [`parse_f64`] and [`parse_i64`] move single cells between
//!   Polars values and text.
//! - [`column_datetimes`], [`datetime_column`] and [`date_column`] move temporal
//!   data between Polars columns and chrono.
//! - [`format_hms`] renders a number of seconds as `HH:MM:SS` for display.

mod hms;
mod temporal;
mod values;

pub use hms::format_hms;
pub use temporal::{column_datetimes, date_column, datetime_column, datetime_from_micros};
pub use values::{cell_text, format_numeric, parse_f64, parse_i64};
