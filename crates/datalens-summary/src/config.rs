//! Summary options.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SummaryError};

/// Controls which columns are summarized and how much detail is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Number of most frequent values kept for categorical and text columns.
    pub top_k: usize,
    /// Quantiles to interpolate, each in `[0, 1]`.
    pub quantiles: Vec<f64>,
    /// Also summarize `_X_seconds` and `_X_week` helper columns.
    pub include_derived: bool,
    /// Compute statistics over the first N rows only.
    pub preview_rows: Option<usize>,
    /// Rows rendered into [`DatasetSummary::sample_rows`].
    ///
    /// [`DatasetSummary::sample_rows`]: datalens_model::DatasetSummary::sample_rows
    pub sample_rows: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            quantiles: vec![0.05, 0.25, 0.75, 0.95],
            include_derived: false,
            preview_rows: None,
            sample_rows: 5,
        }
    }
}

impl SummaryConfig {
    /// Checks option ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::InvalidConfig`] for `top_k == 0` or a quantile
    /// outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(SummaryError::InvalidConfig {
                option: "top_k",
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some(q) = self
            .quantiles
            .iter()
            .find(|q| !(0.0..=1.0).contains(*q))
        {
            return Err(SummaryError::InvalidConfig {
                option: "quantiles",
                reason: format!("{q} is outside [0, 1]"),
            });
        }
        Ok(())
    }
}
