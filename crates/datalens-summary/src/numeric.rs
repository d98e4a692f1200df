//! Order-independent numeric aggregates.
//!
//! Values are sorted before every reduction, so the same multiset of values
//! gives bit-identical results whatever the row order.

use datalens_model::{NumericStats, QuantileStat, Stat};

/// Computes aggregates over finite values; `NaN` and infinities are skipped.
pub fn numeric_stats(values: impl IntoIterator<Item = f64>, quantiles: &[f64]) -> NumericStats {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);

    let quantiles = quantiles
        .iter()
        .map(|&quantile| QuantileStat {
            quantile,
            value: quantile_sorted(&sorted, quantile),
        })
        .collect();

    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return NumericStats {
            quantiles,
            ..NumericStats::default()
        };
    };

    let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
    NumericStats {
        count: sorted.len(),
        mean: Stat::from_value(mean),
        median: quantile_sorted(&sorted, 0.5),
        std_dev: sample_std_dev(&sorted, mean),
        min: Stat::Value(min),
        max: Stat::Value(max),
        quantiles,
    }
}

/// Linear interpolation between the two closest ranks.
fn quantile_sorted(sorted: &[f64], q: f64) -> Stat {
    match sorted {
        [] => Stat::Undefined,
        [only] => Stat::Value(*only),
        _ => {
            let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            let t = pos - lower as f64;
            Stat::from_value((1.0 - t) * sorted[lower] + t * sorted[upper])
        }
    }
}

/// Sample standard deviation; undefined below two values.
fn sample_std_dev(sorted: &[f64], mean: f64) -> Stat {
    if sorted.len() < 2 {
        return Stat::Undefined;
    }
    let squares: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
    Stat::from_value((squares / (sorted.len() - 1) as f64).sqrt())
}
