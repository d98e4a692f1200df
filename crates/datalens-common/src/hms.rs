//! `HH:MM:SS` display formatting for second counts.

/// Formats a number of seconds as `HH:MM:SS`.
///
/// Fractional seconds are truncated toward zero, hours are not wrapped at 24
/// (and may exceed two digits), and negative values get a leading `-`.
/// Returns `None` for `NaN` or infinite input.
///
/// # Examples
///
/// ```
/// use datalens_common::format_hms;
///
/// assert_eq!(format_hms(1861.5).as_deref(), Some("00:31:01"));
/// assert_eq!(format_hms(8130.0).as_deref(), Some("02:15:30"));
/// ```
pub fn format_hms(seconds: f64) -> Option<String> {
    if !seconds.is_finite() {
        return None;
    }
    let total = seconds.trunc() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    Some(format!("{sign}{hours:02}:{minutes:02}:{secs:02}"))
}
