//! Dataset summaries for typed datalens frames.
//!
//! [`summarize`] produces one [`ColumnSummary`] per column with statistics
//! chosen by [`ColumnKind`]:
//!
//! - **Integer / Float**: mean, median, sample standard deviation, min, max
//!   and interpolated quantiles
//! - **Duration**: the same, read from the `_X_seconds` sibling
//! - **Datetime**: min, max and distinct count
//! - **Boolean**: true and false counts
//! - **Categorical / Text**: distinct count and the most frequent values
//!
//! Missing values are excluded from every statistic. A statistic with no
//! input is [`Stat::Undefined`], never `NaN`.
//!
//! [`ColumnSummary`]: datalens_model::ColumnSummary
//! [`ColumnKind`]: datalens_model::ColumnKind
//! [`Stat::Undefined`]: datalens_model::Stat::Undefined

mod config;
mod error;
mod numeric;
mod summarize;

pub use config::SummaryConfig;
pub use error::{Result, SummaryError};
pub use numeric::numeric_stats;
pub use summarize::summarize;
