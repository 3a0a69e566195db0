//! Column models and random sampling primitives.

use crate::record::{Dataset, Scalar};
use crate::types::{DatasetProfile, DominantType, Statistics};
use crate::utils::round_to;
use rand::Rng;
use std::collections::HashSet;
use std::f64::consts::PI;

/// What the generator knows about one source column.
#[derive(Debug, Clone)]
pub(crate) struct ColumnModel {
    pub name: String,
    pub kind: ColumnKind,
    /// Fraction of source records missing this column.
    pub missing_ratio: f64,
}

#[derive(Debug, Clone)]
pub(crate) enum ColumnKind {
    Numeric { stats: Statistics, integer: bool },
    Categorical { values: Vec<String>, dominant: DominantType },
}

impl ColumnModel {
    pub fn is_free_text(&self) -> bool {
        matches!(
            self.kind,
            ColumnKind::Categorical {
                dominant: DominantType::Text,
                ..
            }
        )
    }
}

/// Build one model per column from the profile and the observed values.
pub(crate) fn build_column_models(dataset: &Dataset, profile: &DatasetProfile) -> Vec<ColumnModel> {
    profile
        .column_profiles
        .iter()
        .map(|column| {
            let kind = match (column.is_numeric(), column.statistics) {
                (true, Some(stats)) => ColumnKind::Numeric {
                    stats,
                    integer: column.dominant_type == DominantType::Integer,
                },
                _ => ColumnKind::Categorical {
                    values: observed_values(dataset, &column.name),
                    dominant: column.dominant_type,
                },
            };
            let missing_ratio = if profile.row_count == 0 {
                0.0
            } else {
                column.missing_count as f64 / profile.row_count as f64
            };
            ColumnModel {
                name: column.name.clone(),
                kind,
                missing_ratio,
            }
        })
        .collect()
}

/// Distinct non-missing values of a column in first-seen order.
fn observed_values(dataset: &Dataset, column: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    dataset
        .column_values(column)
        .filter(|v| !v.is_missing())
        .map(|v| v.to_text().trim().to_string())
        .filter(|text| seen.insert(text.clone()))
        .collect()
}

/// Draw from the standard normal distribution with the Box-Muller transform.
pub(crate) fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // u1 in (0, 1] keeps ln(u1) finite
    let u1: f64 = 1.0 - rng.r#gen::<f64>();
    let u2: f64 = rng.r#gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Draw from `N(mean, std_dev²)`.
pub(crate) fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    mean + standard_normal(rng) * std_dev
}

/// Blend `from` toward `to`. Stays finite whenever both ends are, even
/// when `to - from` overflows.
pub(crate) fn lerp(from: f64, to: f64, weight: f64) -> f64 {
    from * (1.0 - weight) + to * weight
}

/// Convert a generated number into a cell, rounding integers.
pub(crate) fn numeric_scalar(value: f64, integer: bool) -> Scalar {
    if integer {
        Scalar::Int(value.round() as i64)
    } else {
        Scalar::Float(round_to(value, 2))
    }
}
