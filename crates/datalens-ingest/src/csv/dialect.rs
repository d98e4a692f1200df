//! Delimiter sniffing.
//!
//! Each candidate delimiter splits the sample into records. The candidate
//! whose records most consistently share one field count (greater than one)
//! wins; ties keep the earlier candidate.

use ::csv::ReaderBuilder;
use tracing::debug;

/// Delimiters tried, in tie-breaking order.
const CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Records examined per candidate.
const MAX_SAMPLE_RECORDS: usize = 200;

/// Guesses the field delimiter of a CSV sample.
///
/// `complete` tells whether `sample` is the whole input; when it is not, the
/// last record may be cut off and is ignored. Falls back to `,`.
pub fn sniff_delimiter(sample: &str, complete: bool) -> u8 {
    let mut best: Option<(u8, f64)> = None;
    for &candidate in &CANDIDATES {
        let Some(score) = consistency(sample, candidate, complete) else {
            continue;
        };
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }
    let delimiter = best.map_or(b',', |(delimiter, _)| delimiter);
    debug!(delimiter = %char::from(delimiter).escape_debug(), "Sniffed delimiter");
    delimiter
}

/// Share of records whose field count equals the most common field count,
/// or `None` when that count is one (the delimiter never splits).
fn consistency(sample: &str, delimiter: u8, complete: bool) -> Option<f64> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(sample.as_bytes());

    let mut counts: Vec<usize> = reader
        .records()
        .take(MAX_SAMPLE_RECORDS)
        .map_while(|record| record.ok().map(|r| r.len()))
        .collect();
    if !complete && counts.len() > 1 {
        counts.pop();
    }
    if counts.is_empty() {
        return None;
    }

    // (field count, occurrences), first-seen order.
    let mut tally: Vec<(usize, usize)> = Vec::new();
    for count in &counts {
        match tally.iter_mut().find(|(fields, _)| fields == count) {
            Some((_, seen)) => *seen += 1,
            None => tally.push((*count, 1)),
        }
    }
    let (fields, occurrences) = tally
        .iter()
        .copied()
        .fold((0, 0), |acc, entry| if entry.1 > acc.1 { entry } else { acc });
    if fields <= 1 {
        return None;
    }
    Some(occurrences as f64 / counts.len() as f64)
}
