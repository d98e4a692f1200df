//! Frame to [`DatasetSummary`].

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use datalens_common::column_datetimes;
use datalens_model::{
    BooleanStats, ColumnKind, ColumnMeta, ColumnStats, ColumnSummary, DatasetSummary,
    DatetimeStats, DurationStats, Frame, FrequencyStats, SchemaField, ValueCount,
    seconds_column_name,
};
use datalens_transform::canonical_text;
use polars::prelude::*;
use tracing::debug;

use crate::config::SummaryConfig;
use crate::error::{Result, SummaryError};
use crate::numeric::numeric_stats;

/// Summarizes every column of a typed frame.
///
/// Helper columns are skipped unless `config.include_derived` is set. The
/// frame is only read.
///
/// # Errors
///
/// - [`SummaryError::InvalidConfig`] for out-of-range options
/// - [`SummaryError::MissingHelper`] when a duration column was not
///   normalized first
pub fn summarize(frame: &Frame, name: &str, config: &SummaryConfig) -> Result<DatasetSummary> {
    config.validate()?;

    let limited;
    let frame = match config.preview_rows {
        Some(rows) if rows < frame.row_count() => {
            limited = frame.head(rows);
            &limited
        }
        _ => frame,
    };

    let selected: Vec<(&ColumnMeta, &Column)> = frame
        .iter()
        .filter(|(meta, _)| config.include_derived || !meta.role.is_helper())
        .collect();

    let mut columns = Vec::with_capacity(selected.len());
    for (meta, column) in &selected {
        let summary = summarize_column(frame, meta, column, config)?;
        debug!(
            column = %summary.name,
            kind = %summary.kind,
            missing = summary.missing_count,
            "Summarized column"
        );
        columns.push(summary);
    }

    let schema = selected
        .iter()
        .map(|(meta, column)| SchemaField {
            name: meta.name.clone(),
            kind: meta.kind,
            nullable: column.null_count() > 0,
        })
        .collect();

    Ok(DatasetSummary {
        name: name.to_string(),
        schema,
        row_count: frame.row_count(),
        column_count: selected.len(),
        sample_rows: sample_rows(&selected, config.sample_rows)?,
        columns,
    })
}

fn summarize_column(
    frame: &Frame,
    meta: &ColumnMeta,
    column: &Column,
    config: &SummaryConfig,
) -> Result<ColumnSummary> {
    let row_count = column.len();
    let mut missing_count = column.null_count();

    let stats = match meta.kind {
        kind if kind.is_numeric() => {
            ColumnStats::Numeric(numeric_stats(float_values(column)?, &config.quantiles))
        }
        ColumnKind::Duration => {
            let helper = seconds_column_name(&meta.name);
            let seconds = frame
                .column(&helper)
                .map_err(|_| SummaryError::MissingHelper {
                    column: meta.name.clone(),
                    helper: helper.clone(),
                })?;
            // Missing wherever the seconds helper is missing.
            missing_count = seconds.null_count();
            ColumnStats::Duration(DurationStats {
                seconds: numeric_stats(float_values(seconds)?, &config.quantiles),
                seconds_column: helper,
            })
        }
        ColumnKind::Datetime => ColumnStats::Datetime(datetime_stats(column)?),
        ColumnKind::Boolean => ColumnStats::Boolean(boolean_stats(column)?),
        kind => {
            let values = canonical_text(column, kind)?;
            // Blank text is missing, as it was during inference.
            missing_count = values.iter().filter(|value| value.is_none()).count();
            ColumnStats::Frequency(frequency_stats(values, config.top_k))
        }
    };
    let missing_rate = if row_count == 0 {
        0.0
    } else {
        missing_count as f64 / row_count as f64
    };

    Ok(ColumnSummary {
        name: meta.name.clone(),
        kind: meta.kind,
        role: meta.role.clone(),
        row_count,
        missing_count,
        missing_rate,
        stats,
        warning: meta.warning.clone(),
    })
}

fn float_values(column: &Column) -> Result<Vec<f64>> {
    let floats = column.cast(&DataType::Float64)?;
    Ok(floats.f64()?.into_iter().flatten().collect())
}

fn datetime_stats(column: &Column) -> Result<DatetimeStats> {
    let values: Vec<NaiveDateTime> = column_datetimes(column)?.into_iter().flatten().collect();
    let distinct: HashSet<&NaiveDateTime> = values.iter().collect();
    Ok(DatetimeStats {
        min: values.iter().min().copied(),
        max: values.iter().max().copied(),
        distinct_count: distinct.len(),
    })
}

fn boolean_stats(column: &Column) -> Result<BooleanStats> {
    let bools = column.cast(&DataType::Boolean)?;
    let mut stats = BooleanStats::default();
    for value in bools.bool()?.into_iter().flatten() {
        if value {
            stats.true_count += 1;
        } else {
            stats.false_count += 1;
        }
    }
    Ok(stats)
}

/// Counts distinct values, keeping the `top_k` most frequent. Equal counts
/// keep first-seen order.
fn frequency_stats(values: Vec<Option<String>>, top_k: usize) -> FrequencyStats {
    let mut counts: Vec<ValueCount> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for value in values.into_iter().flatten() {
        match positions.get(&value) {
            Some(&index) => counts[index].count += 1,
            None => {
                positions.insert(value.clone(), counts.len());
                counts.push(ValueCount { value, count: 1 });
            }
        }
    }

    let distinct_count = counts.len();
    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top_k);
    FrequencyStats {
        distinct_count,
        top_values: counts,
    }
}

fn sample_rows(selected: &[(&ColumnMeta, &Column)], rows: usize) -> Result<Vec<Vec<String>>> {
    let Some(height) = selected.first().map(|(_, column)| column.len().min(rows)) else {
        return Ok(Vec::new());
    };
    let rendered = selected
        .iter()
        .map(|(meta, column)| canonical_text(&column.slice(0, height), meta.kind))
        .collect::<PolarsResult<Vec<_>>>()?;

    Ok((0..height)
        .map(|row| {
            rendered
                .iter()
                .map(|values| values.get(row).cloned().flatten().unwrap_or_default())
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use datalens_model::{ColumnRole, Stat};

    use super::*;

    fn frame(columns: Vec<(Column, ColumnMeta)>) -> Frame {
        let (data, metas): (Vec<Column>, Vec<ColumnMeta>) = columns.into_iter().unzip();
        Frame::new(DataFrame::new(data).unwrap(), metas).unwrap()
    }

    fn text(name: &str, values: &[Option<&str>], kind: ColumnKind) -> (Column, ColumnMeta) {
        (
            Series::new(name.into(), values.to_vec()).into_column(),
            ColumnMeta::source(name, kind),
        )
    }

    #[test]
    fn test_all_missing_numeric_is_undefined() {
        let frame = frame(vec![(
            Series::new("score".into(), &[None::<f64>, None, None]).into_column(),
            ColumnMeta::source("score", ColumnKind::Float),
        )]);
        let summary = summarize(&frame, "scores", &SummaryConfig::default()).unwrap();
        let score = summary.column("score").unwrap();
        assert_eq!(score.missing_count, 3);
        assert!((score.missing_rate - 1.0).abs() < f64::EPSILON);
        let stats = score.stats.numeric().unwrap();
        assert_eq!(stats.mean, Stat::Undefined);
        assert_eq!(stats.quantile(0.25), Stat::Undefined);
    }

    #[test]
    fn test_top_values_ties_keep_first_seen_order() {
        let frame = frame(vec![text(
            "region",
            &[
                Some("EMEA"),
                Some("APAC"),
                Some("AMER"),
                Some("APAC"),
                Some("EMEA"),
                None,
            ],
            ColumnKind::Categorical,
        )]);
        let config = SummaryConfig {
            top_k: 2,
            ..SummaryConfig::default()
        };
        let summary = summarize(&frame, "regions", &config).unwrap();
        let ColumnStats::Frequency(stats) = &summary.column("region").unwrap().stats else {
            panic!("expected frequency stats");
        };
        assert_eq!(stats.distinct_count, 3);
        assert_eq!(
            stats.top_values,
            vec![
                ValueCount {
                    value: "EMEA".to_string(),
                    count: 2
                },
                ValueCount {
                    value: "APAC".to_string(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_padded_categories_count_once() {
        let frame = frame(vec![text(
            "platform",
            &[Some("web"), Some(" web"), Some("web  "), Some("app"), Some("   "), None],
            ColumnKind::Categorical,
        )]);
        let summary = summarize(&frame, "platforms", &SummaryConfig::default()).unwrap();
        let platform = summary.column("platform").unwrap();
        assert_eq!(platform.missing_count, 2);
        let ColumnStats::Frequency(stats) = &platform.stats else {
            panic!("expected frequency stats");
        };
        assert_eq!(stats.distinct_count, 2);
        assert_eq!(
            stats.top_values[0],
            ValueCount {
                value: "web".to_string(),
                count: 3
            }
        );
    }

    #[test]
    fn test_duration_reads_seconds_sibling() {
        let frame = frame(vec![
            text(
                "video_duration",
                &[Some("01:02:03"), Some("00:00:00"), None],
                ColumnKind::Duration,
            ),
            (
                Series::new("_video_duration_seconds".into(), &[Some(3723.0), Some(0.0), None])
                    .into_column(),
                ColumnMeta::derived(
                    "_video_duration_seconds",
                    ColumnKind::Float,
                    ColumnRole::DurationSeconds {
                        source: "video_duration".to_string(),
                    },
                ),
            ),
        ]);
        let summary = summarize(&frame, "videos", &SummaryConfig::default()).unwrap();
        assert_eq!(summary.column_count, 1);
        assert!(summary.column("_video_duration_seconds").is_none());

        let ColumnStats::Duration(stats) = &summary.column("video_duration").unwrap().stats else {
            panic!("expected duration stats");
        };
        assert_eq!(stats.seconds.mean, Stat::Value(1861.5));
        assert_eq!(stats.mean_display().as_deref(), Some("00:31:01"));

        let with_helpers = SummaryConfig {
            include_derived: true,
            ..SummaryConfig::default()
        };
        let summary = summarize(&frame, "videos", &with_helpers).unwrap();
        assert_eq!(summary.column_count, 2);
    }

    #[test]
    fn test_duration_missing_counts_unparsed_values() {
        let frame = frame(vec![
            text(
                "watch_time",
                &[Some("00:01:00"), Some("garbage"), Some("00:03:00"), None],
                ColumnKind::Duration,
            ),
            (
                Series::new("_watch_time_seconds".into(), &[Some(60.0), None, Some(180.0), None])
                    .into_column(),
                ColumnMeta::derived(
                    "_watch_time_seconds",
                    ColumnKind::Float,
                    ColumnRole::DurationSeconds {
                        source: "watch_time".to_string(),
                    },
                ),
            ),
        ]);
        let summary = summarize(&frame, "videos", &SummaryConfig::default()).unwrap();
        let watch_time = summary.column("watch_time").unwrap();

        assert_eq!(watch_time.row_count, 4);
        assert_eq!(watch_time.missing_count, 2);
        assert!((watch_time.missing_rate - 0.5).abs() < f64::EPSILON);
        let ColumnStats::Duration(stats) = &watch_time.stats else {
            panic!("expected duration stats");
        };
        assert_eq!(stats.seconds.count, watch_time.row_count - watch_time.missing_count);
    }

    #[test]
    fn test_duration_without_helper_fails() {
        let frame = frame(vec![text(
            "video_duration",
            &[Some("01:02:03")],
            ColumnKind::Duration,
        )]);
        assert!(matches!(
            summarize(&frame, "videos", &SummaryConfig::default()),
            Err(SummaryError::MissingHelper { .. })
        ));
    }

    #[test]
    fn test_boolean_and_datetime() {
        let when = datalens_common::datetime_column(
            "when",
            &[
                chrono::NaiveDate::from_ymd_opt(2026, 2, 9).unwrap().and_hms_opt(0, 0, 0),
                chrono::NaiveDate::from_ymd_opt(2026, 2, 1).unwrap().and_hms_opt(12, 0, 0),
                None,
            ],
        )
        .unwrap();
        let frame = frame(vec![
            (
                Series::new("active".into(), &[Some(true), Some(false), Some(true)]).into_column(),
                ColumnMeta::source("active", ColumnKind::Boolean),
            ),
            (when, ColumnMeta::source("when", ColumnKind::Datetime)),
        ]);
        let summary = summarize(&frame, "mixed", &SummaryConfig::default()).unwrap();

        assert_eq!(
            summary.column("active").unwrap().stats,
            ColumnStats::Boolean(BooleanStats {
                true_count: 2,
                false_count: 1
            })
        );
        let ColumnStats::Datetime(stats) = &summary.column("when").unwrap().stats else {
            panic!("expected datetime stats");
        };
        assert_eq!(stats.distinct_count, 2);
        assert_eq!(
            stats.min,
            chrono::NaiveDate::from_ymd_opt(2026, 2, 1).unwrap().and_hms_opt(12, 0, 0)
        );
    }

    #[test]
    fn test_preview_rows_and_samples() {
        let frame = frame(vec![(
            Series::new("n".into(), &[1i64, 2, 3, 4]).into_column(),
            ColumnMeta::source("n", ColumnKind::Integer),
        )]);
        let config = SummaryConfig {
            preview_rows: Some(2),
            sample_rows: 5,
            ..SummaryConfig::default()
        };
        let summary = summarize(&frame, "numbers", &config).unwrap();
        assert_eq!(summary.row_count, 2);
        assert_eq!(summary.column("n").unwrap().stats.numeric().unwrap().count, 2);
        assert_eq!(
            summary.sample_rows,
            vec![vec!["1".to_string()], vec!["2".to_string()]]
        );
        // The caller's frame is untouched.
        assert_eq!(frame.row_count(), 4);
    }
}
