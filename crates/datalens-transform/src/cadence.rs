//! Monday-start week buckets for datetime columns.

use chrono::{Datelike, NaiveDate};
use datalens_common::{column_datetimes, date_column};
use datalens_model::{ColumnKind, ColumnMeta, ColumnRole, Frame, cadence_column_name};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TransformError};

/// Which datetime columns get a `_X_week` sibling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    pub enabled: bool,
    /// Restrict to these columns. `None` means every datetime source column.
    pub source_columns: Option<Vec<String>>,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source_columns: None,
        }
    }
}

/// The Monday that starts the ISO week containing `date`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use datalens_transform::week_start;
///
/// let wednesday = NaiveDate::from_ymd_opt(2026, 2, 11).unwrap();
/// assert_eq!(week_start(wednesday), NaiveDate::from_ymd_opt(2026, 2, 9).unwrap());
/// ```
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday();
    date - chrono::Days::new(u64::from(offset))
}

/// Appends a `_X_week` date column for each selected datetime column.
///
/// Missing datetimes stay missing. Columns whose bucket already exists are
/// skipped, so the operation is idempotent.
///
/// # Errors
///
/// Fails if a configured column is absent or is not a datetime column.
pub fn build_cadence_columns(frame: &mut Frame, config: &CadenceConfig) -> Result<usize> {
    if !config.enabled {
        return Ok(0);
    }
    let sources = select_sources(frame, config)?;

    let mut added = 0;
    for source in sources {
        let target = cadence_column_name(&source);
        if frame
            .meta(&target)
            .is_some_and(|meta| meta.role.source() == Some(source.as_str()))
        {
            continue;
        }
        let weeks: Vec<Option<NaiveDate>> = column_datetimes(frame.column(&source)?)?
            .into_iter()
            .map(|value| value.map(|dt| week_start(dt.date())))
            .collect();
        let column = date_column(&target, &weeks)?;
        debug!(column = %source, derived = %target, "Derived cadence column");
        let meta = ColumnMeta::derived(target, ColumnKind::Datetime, ColumnRole::Cadence { source });
        frame.push_derived(meta, column)?;
        added += 1;
    }
    Ok(added)
}

fn select_sources(frame: &Frame, config: &CadenceConfig) -> Result<Vec<String>> {
    let Some(requested) = &config.source_columns else {
        return Ok(frame
            .columns()
            .iter()
            .filter(|meta| meta.kind == ColumnKind::Datetime && meta.role == ColumnRole::Source)
            .map(|meta| meta.name.clone())
            .collect());
    };

    let missing: Vec<String> = requested
        .iter()
        .filter(|name| frame.meta(name).is_none())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(TransformError::MissingColumns { columns: missing });
    }
    for name in requested {
        if let Some(meta) = frame.meta(name)
            && meta.kind != ColumnKind::Datetime
        {
            return Err(TransformError::NotDatetime {
                column: name.clone(),
                kind: meta.kind.to_string(),
            });
        }
    }
    Ok(requested.clone())
}
