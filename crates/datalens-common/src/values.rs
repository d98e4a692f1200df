//! Cell-level text and number conversions.

use std::borrow::Cow;

use polars::prelude::AnyValue;

/// Renders one cell as text, or `None` when it is null or blank.
///
/// Floats drop trailing zeros, string cells are passed through and every
/// other type uses its `Display` form without surrounding quotes.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use datalens_common::cell_text;
///
/// assert_eq!(cell_text(AnyValue::Null), None);
/// assert_eq!(cell_text(AnyValue::Float64(2.50)).as_deref(), Some("2.5"));
/// assert_eq!(cell_text(AnyValue::String(" ")), None);
/// ```
pub fn cell_text(value: AnyValue<'_>) -> Option<String> {
    let text: Cow<'_, str> = match value {
        AnyValue::Null => return None,
        AnyValue::String(s) => Cow::Borrowed(s),
        AnyValue::StringOwned(s) => Cow::Owned(s.to_string()),
        AnyValue::Float32(v) => Cow::Owned(format_numeric(f64::from(v))),
        AnyValue::Float64(v) => Cow::Owned(format_numeric(v)),
        other => {
            let rendered = other.to_string();
            match rendered.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
                Some(inner) => Cow::Owned(inner.to_string()),
                None => Cow::Owned(rendered),
            }
        }
    };
    (!text.trim().is_empty()).then(|| text.into_owned())
}

/// Shortest decimal form of `v`: `40.0` is `"40"`, `2.50` is `"2.5"`.
///
/// # Examples
///
/// ```
/// use datalens_common::format_numeric;
///
/// assert_eq!(format_numeric(40.0), "40");
/// assert_eq!(format_numeric(0.125), "0.125");
/// ```
pub fn format_numeric(v: f64) -> String {
    let rendered = v.to_string();
    match rendered.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                whole.to_string()
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => rendered,
    }
}

/// Parses trimmed text as a finite float. `NaN` and infinities are rejected.
pub fn parse_f64(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}

/// Parses trimmed text as a whole number. `"1.0"` is not an integer.
pub fn parse_i64(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_by_type() {
        assert_eq!(cell_text(AnyValue::Int64(-100)).as_deref(), Some("-100"));
        assert_eq!(cell_text(AnyValue::UInt32(0)).as_deref(), Some("0"));
        assert_eq!(cell_text(AnyValue::Float64(1.0)).as_deref(), Some("1"));
        assert_eq!(cell_text(AnyValue::Boolean(false)).as_deref(), Some("false"));
        assert_eq!(cell_text(AnyValue::String("web")).as_deref(), Some("web"));
        assert_eq!(cell_text(AnyValue::String("")), None);
    }

    #[test]
    fn test_format_numeric() {
        assert_eq!(format_numeric(0.0), "0");
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(10.5), "10.5");
        assert_eq!(format_numeric(-2.25), "-2.25");
        assert_eq!(format_numeric(1861.5), "1861.5");
    }

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64("  3.25  "), Some(3.25));
        assert_eq!(parse_f64("1e3"), Some(1000.0));
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64("inf"), None);
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("12 apples"), None);
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64(""), None);
        assert_eq!(parse_i64("  -100  "), Some(-100));
        assert_eq!(parse_i64("+7"), Some(7));
        assert_eq!(parse_i64("1.5"), None);
        assert_eq!(parse_i64("1.0"), None);
    }
}
