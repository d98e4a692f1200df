//! Semantic type inference for text columns.
//!
//! Every source column that is still text is tried against each kind in
//! priority order:
//!
//! 1. **Integer**, then **Float**
//! 2. **Boolean** from a configurable vocabulary
//! 3. **Datetime** with the single best-matching format
//! 4. **Duration** (`HH:MM:SS`, `H:MM:SS`, `MM:SS`)
//! 5. **Categorical** when distinct values are few relative to the column
//! 6. **Text**, which always succeeds
//!
//! A kind is adopted when at least `success_threshold` of the non-missing
//! values parse. Values that do not parse become missing and the column
//! carries a [`CoercionWarning`]. Columns without a single non-missing value
//! stay text.

use std::collections::HashSet;

use datalens_common::{
    cell_text, column_datetimes, datetime_column, format_numeric, parse_f64, parse_i64,
};
use datalens_model::{CoercionWarning, ColumnKind, ColumnRole, Frame};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::datetime::{best_format, format_datetime};
use crate::duration::parse_duration_seconds;
use crate::error::{Result, TransformError};

/// Rejected values quoted in a warning.
const MAX_WARNING_EXAMPLES: usize = 3;

/// Thresholds and vocabulary for type inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Minimum share of non-missing values that must parse, in (0, 1].
    pub success_threshold: f64,
    /// Maximum distinct/non-missing ratio for a categorical column, in (0, 1].
    pub categorical_ratio: f64,
    /// Case-insensitive spellings of `true`.
    pub true_values: Vec<String>,
    /// Case-insensitive spellings of `false`.
    pub false_values: Vec<String>,
    /// Columns that must be present for inference to proceed.
    pub required_columns: Vec<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            success_threshold: 0.95,
            categorical_ratio: 0.5,
            true_values: ["true", "yes", "y", "t", "on"].map(String::from).to_vec(),
            false_values: ["false", "no", "n", "f", "off"].map(String::from).to_vec(),
            required_columns: Vec::new(),
        }
    }
}

impl InferenceConfig {
    fn parse_bool(&self, value: &str) -> Option<bool> {
        if self.true_values.iter().any(|t| t.eq_ignore_ascii_case(value)) {
            Some(true)
        } else if self.false_values.iter().any(|f| f.eq_ignore_ascii_case(value)) {
            Some(false)
        } else {
            None
        }
    }
}

/// Outcome of inferring one column.
struct Inferred {
    kind: ColumnKind,
    /// Replacement values, or `None` to keep the text as is.
    column: Option<Column>,
    warning: Option<CoercionWarning>,
}

/// Assigns a kind to every untyped text column, coercing values in place.
///
/// Returns the warnings attached to coerced columns.
///
/// # Errors
///
/// - [`TransformError::MissingColumns`] when a required column is absent
/// - [`TransformError::EmptyFrame`] when columns are required but the frame
///   has no rows
pub fn infer_frame(frame: &mut Frame, config: &InferenceConfig) -> Result<Vec<CoercionWarning>> {
    check_required(frame, &config.required_columns)?;

    let candidates: Vec<String> = frame
        .iter()
        .filter(|(meta, column)| {
            meta.role == ColumnRole::Source
                && meta.kind == ColumnKind::Text
                && column.dtype() == &DataType::String
        })
        .map(|(meta, _)| meta.name.clone())
        .collect();

    let mut warnings = Vec::new();
    for name in candidates {
        let inferred = infer_column(&name, frame.column(&name)?, config)?;
        debug!(column = %name, kind = %inferred.kind, "Inferred column type");
        if let Some(warning) = &inferred.warning {
            warn!(
                column = %name,
                kind = %warning.kind,
                dropped = warning.dropped,
                total = warning.total,
                "Values dropped during coercion"
            );
            warnings.push(warning.clone());
        }
        let values = match inferred.column {
            Some(column) => column,
            None => frame.column(&name)?.clone(),
        };
        frame.replace_column(values, inferred.kind, inferred.warning)?;
    }
    Ok(warnings)
}

fn check_required(frame: &Frame, required: &[String]) -> Result<()> {
    if required.is_empty() {
        return Ok(());
    }
    let missing: Vec<String> = required
        .iter()
        .filter(|name| frame.meta(name).is_none())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(TransformError::MissingColumns { columns: missing });
    }
    if frame.row_count() == 0 {
        return Err(TransformError::EmptyFrame {
            columns: required.to_vec(),
        });
    }
    Ok(())
}

fn infer_column(name: &str, column: &Column, config: &InferenceConfig) -> Result<Inferred> {
    let values: Vec<Option<&str>> = column
        .str()?
        .into_iter()
        .map(|value| value.map(str::trim).filter(|value| !value.is_empty()))
        .collect();
    let present: Vec<&str> = values.iter().flatten().copied().collect();
    let total = present.len();
    if total == 0 {
        return Ok(Inferred {
            kind: ColumnKind::Text,
            column: None,
            warning: None,
        });
    }
    let accepts = |parsed: usize| parsed as f64 / total as f64 >= config.success_threshold;

    let attempt = Attempt::run(&values, parse_i64);
    if accepts(attempt.parsed) {
        let warning = attempt.warning(name, ColumnKind::Integer, total);
        return Ok(Inferred {
            kind: ColumnKind::Integer,
            column: Some(Series::new(name.into(), attempt.values).into_column()),
            warning,
        });
    }

    let attempt = Attempt::run(&values, parse_f64);
    if accepts(attempt.parsed) {
        let warning = attempt.warning(name, ColumnKind::Float, total);
        return Ok(Inferred {
            kind: ColumnKind::Float,
            column: Some(Series::new(name.into(), attempt.values).into_column()),
            warning,
        });
    }

    let attempt = Attempt::run(&values, |value| config.parse_bool(value));
    if accepts(attempt.parsed) {
        let warning = attempt.warning(name, ColumnKind::Boolean, total);
        return Ok(Inferred {
            kind: ColumnKind::Boolean,
            column: Some(Series::new(name.into(), attempt.values).into_column()),
            warning,
        });
    }

    if let Some((format, parsed)) = best_format(present.iter().copied())
        && accepts(parsed)
    {
        let attempt = Attempt::run(&values, |value| format.parse(value));
        debug!(column = name, format = format.pattern(), "Selected datetime format");
        let warning = attempt.warning(name, ColumnKind::Datetime, total);
        return Ok(Inferred {
            kind: ColumnKind::Datetime,
            column: Some(datetime_column(name, &attempt.values)?),
            warning,
        });
    }

    // Duration text is kept verbatim; the seconds sibling carries the numbers.
    let attempt = Attempt::run(&values, parse_duration_seconds);
    if accepts(attempt.parsed) {
        return Ok(Inferred {
            kind: ColumnKind::Duration,
            column: None,
            warning: attempt.warning(name, ColumnKind::Duration, total),
        });
    }

    let distinct: HashSet<&str> = present.iter().copied().collect();
    let kind = if distinct.len() as f64 / total as f64 <= config.categorical_ratio {
        ColumnKind::Categorical
    } else {
        ColumnKind::Text
    };
    Ok(Inferred {
        kind,
        column: None,
        warning: None,
    })
}

/// Values parsed under one kind, with the raw values that failed.
struct Attempt<'a, T> {
    values: Vec<Option<T>>,
    parsed: usize,
    rejected: Vec<&'a str>,
}

impl<'a, T> Attempt<'a, T> {
    fn run(values: &[Option<&'a str>], parse: impl Fn(&str) -> Option<T>) -> Self {
        let mut rejected = Vec::new();
        let mut parsed = 0;
        let values = values
            .iter()
            .map(|value| {
                let raw = (*value)?;
                let result = parse(raw);
                match result {
                    Some(_) => parsed += 1,
                    None => rejected.push(raw),
                }
                result
            })
            .collect();
        Self {
            values,
            parsed,
            rejected,
        }
    }

    fn warning(&self, column: &str, kind: ColumnKind, total: usize) -> Option<CoercionWarning> {
        if self.rejected.is_empty() {
            return None;
        }
        let mut examples: Vec<String> = Vec::new();
        for raw in &self.rejected {
            if examples.len() == MAX_WARNING_EXAMPLES {
                break;
            }
            if !examples.iter().any(|seen| seen == raw) {
                examples.push((*raw).to_string());
            }
        }
        Some(CoercionWarning {
            column: column.to_string(),
            kind,
            dropped: self.rejected.len(),
            total,
            examples,
        })
    }
}

/// Renders a typed column as canonical text.
///
/// Integers print in plain decimal, floats without trailing zeros, booleans
/// as `true`/`false` and datetimes as `%Y-%m-%dT%H:%M:%S`. Other kinds are
/// returned verbatim. Missing values are `None`.
///
/// # Errors
///
/// Fails if the column's data type does not fit `kind`.
pub fn canonical_text(column: &Column, kind: ColumnKind) -> PolarsResult<Vec<Option<String>>> {
    let rendered: Vec<Option<String>> = match kind {
        ColumnKind::Integer => {
            let ints = column.cast(&DataType::Int64)?;
            ints.i64()?
                .into_iter()
                .map(|value| value.map(|v| v.to_string()))
                .collect()
        }
        ColumnKind::Float => {
            let floats = column.cast(&DataType::Float64)?;
            floats
                .f64()?
                .into_iter()
                .map(|value| value.map(format_numeric))
                .collect()
        }
        ColumnKind::Boolean => {
            let bools = column.cast(&DataType::Boolean)?;
            bools
                .bool()?
                .into_iter()
                .map(|value| value.map(|v| v.to_string()))
                .collect()
        }
        ColumnKind::Datetime => column_datetimes(column)?
            .into_iter()
            .map(|value| value.map(format_datetime))
            .collect(),
        ColumnKind::Duration | ColumnKind::Categorical | ColumnKind::Text => (0..column.len())
            .map(|index| {
                column
                    .get(index)
                    .map(|value| cell_text(value).map(|text| text.trim().to_string()))
            })
            .collect::<PolarsResult<_>>()?,
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use datalens_model::ColumnMeta;

    use super::*;

    fn frame_of(columns: &[(&str, Vec<Option<&str>>)]) -> Frame {
        let columns: Vec<Column> = columns
            .iter()
            .map(|(name, values)| Series::new((*name).into(), values.clone()).into_column())
            .collect();
        Frame::from_text(DataFrame::new(columns).unwrap()).unwrap()
    }

    fn kind_of(frame: &Frame, name: &str) -> ColumnKind {
        frame.meta(name).unwrap().kind
    }

    #[test]
    fn test_priority_order() {
        let mut frame = frame_of(&[
            ("int", vec![Some("1"), Some("-2"), Some("30")]),
            ("float", vec![Some("1.5"), Some("2"), Some("-0.25")]),
            ("bool", vec![Some("Yes"), Some("no"), Some("Y")]),
            ("when", vec![Some("2026-02-11"), Some("2026-02-12"), None]),
            ("dur", vec![Some("01:02:03"), Some("00:00:00"), Some("12:30")]),
            ("text", vec![Some("alpha"), Some("beta"), Some("gamma")]),
        ]);
        let warnings = infer_frame(&mut frame, &InferenceConfig::default()).unwrap();
        assert!(warnings.is_empty());

        assert_eq!(kind_of(&frame, "int"), ColumnKind::Integer);
        assert_eq!(kind_of(&frame, "float"), ColumnKind::Float);
        assert_eq!(kind_of(&frame, "bool"), ColumnKind::Boolean);
        assert_eq!(kind_of(&frame, "when"), ColumnKind::Datetime);
        assert_eq!(kind_of(&frame, "dur"), ColumnKind::Duration);
        assert_eq!(kind_of(&frame, "text"), ColumnKind::Text);
        assert_eq!(frame.column("int").unwrap().dtype(), &DataType::Int64);
        assert_eq!(frame.column("bool").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(
            frame.column("when").unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Microseconds, None)
        );
        assert_eq!(frame.column("dur").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_categorical_ratio() {
        let mut frame = frame_of(&[(
            "region",
            vec![Some("APAC"), Some("EMEA"), Some("APAC"), Some("APAC")],
        )]);
        infer_frame(&mut frame, &InferenceConfig::default()).unwrap();
        assert_eq!(kind_of(&frame, "region"), ColumnKind::Categorical);
    }

    #[test]
    fn test_shortfall_becomes_missing_with_warning() {
        let mut values: Vec<Option<&str>> = vec![Some("10"); 39];
        values.push(Some("ten"));
        let mut frame = frame_of(&[("amount", values)]);

        let warnings = infer_frame(&mut frame, &InferenceConfig::default()).unwrap();

        assert_eq!(kind_of(&frame, "amount"), ColumnKind::Integer);
        assert_eq!(frame.column("amount").unwrap().null_count(), 1);
        let warning = frame.meta("amount").unwrap().warning.clone().unwrap();
        assert_eq!(warnings, vec![warning.clone()]);
        insta::assert_json_snapshot!(warning, @r#"
        {
          "column": "amount",
          "kind": "integer",
          "dropped": 1,
          "total": 40,
          "examples": [
            "ten"
          ]
        }
        "#);
    }

    #[test]
    fn test_below_threshold_stays_text() {
        let mut frame = frame_of(&[("mixed", vec![Some("1"), Some("2"), Some("x"), Some("y")])]);
        infer_frame(&mut frame, &InferenceConfig::default()).unwrap();
        assert_eq!(kind_of(&frame, "mixed"), ColumnKind::Text);
        assert_eq!(frame.column("mixed").unwrap().null_count(), 0);
    }

    #[test]
    fn test_all_missing_stays_text_without_warning() {
        let mut frame = frame_of(&[("empty", vec![None, None])]);
        let warnings = infer_frame(&mut frame, &InferenceConfig::default()).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(kind_of(&frame, "empty"), ColumnKind::Text);
        assert!(frame.meta("empty").unwrap().warning.is_none());
    }

    #[test]
    fn test_required_columns() {
        let mut frame = frame_of(&[("a", vec![Some("1")])]);
        let config = InferenceConfig {
            required_columns: vec!["a".to_string(), "b".to_string()],
            ..InferenceConfig::default()
        };
        let err = infer_frame(&mut frame, &config).unwrap_err();
        assert!(matches!(err, TransformError::MissingColumns { ref columns } if columns == &["b"]));

        let mut empty = frame_of(&[("a", vec![])]);
        let config = InferenceConfig {
            required_columns: vec!["a".to_string()],
            ..InferenceConfig::default()
        };
        assert!(matches!(
            infer_frame(&mut empty, &config),
            Err(TransformError::EmptyFrame { .. })
        ));
    }

    #[test]
    fn test_typed_columns_are_left_alone() {
        let df = df! { "n" => &[1i64, 2] }.unwrap();
        let mut frame =
            Frame::new(df, vec![ColumnMeta::source("n", ColumnKind::Integer)]).unwrap();
        infer_frame(&mut frame, &InferenceConfig::default()).unwrap();
        assert_eq!(kind_of(&frame, "n"), ColumnKind::Integer);
    }

    #[test]
    fn test_custom_boolean_vocabulary() {
        let mut frame = frame_of(&[("flag", vec![Some("はい"), Some("いいえ"), Some("はい")])]);
        let config = InferenceConfig {
            true_values: vec!["はい".to_string()],
            false_values: vec!["いいえ".to_string()],
            ..InferenceConfig::default()
        };
        infer_frame(&mut frame, &config).unwrap();
        assert_eq!(kind_of(&frame, "flag"), ColumnKind::Boolean);
    }

    #[test]
    fn test_canonical_text() {
        let mut frame = frame_of(&[
            ("f", vec![Some("1.50"), None]),
            ("d", vec![Some("2026/02/11 09:05"), Some("2026/02/12 10:00")]),
        ]);
        infer_frame(&mut frame, &InferenceConfig::default()).unwrap();

        assert_eq!(
            canonical_text(frame.column("f").unwrap(), ColumnKind::Float).unwrap(),
            vec![Some("1.5".to_string()), None]
        );
        assert_eq!(
            canonical_text(frame.column("d").unwrap(), ColumnKind::Datetime).unwrap(),
            vec![
                Some("2026-02-11T09:05:00".to_string()),
                Some("2026-02-12T10:00:00".to_string())
            ]
        );
    }

    #[test]
    fn test_canonical_text_trims_categories() {
        let column = Series::new("c".into(), [Some(" web "), Some("  "), None]).into_column();
        assert_eq!(
            canonical_text(&column, ColumnKind::Categorical).unwrap(),
            vec![Some("web".to_string()), None, None]
        );
    }
}
