//! Shared utilities for the analytics engine.
//!
//! Numeric parsing, small statistics helpers and vector math used by
//! several stages.

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Text values accepted as booleans (compared case-insensitively).
pub const BOOLEAN_WORDS: [&str; 6] = ["true", "false", "yes", "no", "այո", "ոչ"];

/// Check if a string is a recognised boolean word.
///
/// # Example
///
/// ```rust,ignore
/// use lex_analytics::utils::is_boolean_string;
///
/// assert!(is_boolean_string("Yes"));
/// assert!(is_boolean_string("ՈՉ"));
/// assert!(!is_boolean_string("1"));
/// ```
pub fn is_boolean_string(s: &str) -> bool {
    let lower = s.trim().to_lowercase();
    BOOLEAN_WORDS.iter().any(|&word| lower == word)
}

/// Parse a string as a finite number.
///
/// Only plain decimal notation is accepted (optional sign, digits, one
/// decimal point, optional exponent). Words such as `inf` or `NaN` that
/// `f64::from_str` would accept are rejected.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
    {
        return None;
    }
    if !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Check if a string parses as a number.
#[inline]
pub fn is_numeric_string(s: &str) -> bool {
    parse_number(s).is_some()
}

// =============================================================================
// Statistics Utilities
// =============================================================================

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`).
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Median of the values; the slice does not need to be sorted.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Round to a fixed number of decimal places.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Percentage of `part` in `whole`, 0 when `whole` is 0.
#[inline]
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

// =============================================================================
// Vector Utilities
// =============================================================================

/// Squared Euclidean distance between two equally sized vectors.
#[inline]
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Euclidean distance between two equally sized vectors.
#[inline]
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Euclidean norm of a vector.
#[inline]
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Component-wise mean of the vectors selected by `indices`.
///
/// Returns `None` when `indices` is empty.
pub fn centroid(vectors: &[Vec<f64>], indices: &[usize]) -> Option<Vec<f64>> {
    let first = vectors.get(*indices.first()?)?;
    let mut sum = vec![0.0; first.len()];
    for &idx in indices {
        for (acc, x) in sum.iter_mut().zip(&vectors[idx]) {
            *acc += x;
        }
    }
    let n = indices.len() as f64;
    Some(sum.into_iter().map(|x| x / n).collect())
}

// =============================================================================
// Hashing
// =============================================================================

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a hash over the UTF-8 bytes of `s`.
pub fn fnv1a_64(s: &str) -> u64 {
    s.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}
