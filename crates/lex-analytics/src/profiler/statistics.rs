//! Statistical analysis functions for column profiling.

use crate::record::Scalar;
use crate::types::Statistics;
use crate::utils::{mean, median, population_std_dev};

/// Numeric values of a column, skipping missing and non-numeric cells.
pub(crate) fn numeric_values<'a>(values: impl Iterator<Item = &'a Scalar>) -> Vec<f64> {
    values
        .filter(|v| !v.is_missing())
        .filter_map(Scalar::as_f64)
        .collect()
}

/// Compute min/max/mean/median and population standard deviation.
///
/// Returns `None` when there are no values.
pub(crate) fn compute_statistics(values: &[f64]) -> Option<Statistics> {
    let mean = mean(values)?;
    let median = median(values)?;
    let std_dev = population_std_dev(values)?;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(Statistics {
        min,
        max,
        mean,
        median,
        std_dev,
    })
}

/// Absolute z-score of `value`, 0 when the spread is zero.
#[inline]
pub(crate) fn abs_z_score(value: f64, stats: &Statistics) -> f64 {
    if stats.std_dev > 0.0 {
        ((value - stats.mean) / stats.std_dev).abs()
    } else {
        0.0
    }
}
