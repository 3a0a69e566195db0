//! Record-to-vector encoding shared by every clustering method.

use crate::error::{AnalyticsError, Result};
use crate::record::{Dataset, Scalar};
use crate::utils::fnv1a_64;

/// Share of numeric values (among non-missing) that makes a column numeric.
const NUMERIC_COLUMN_SHARE: f64 = 0.7;
const HASH_BUCKETS: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Encoding {
    /// Min-max normalized into [0, 1].
    Numeric { min: f64, max: f64 },
    /// FNV-1a hash reduced to [0, 1).
    Hashed,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Dimension {
    pub column: String,
    pub encoding: Encoding,
}

#[derive(Debug, Clone)]
pub(crate) struct FeatureMatrix {
    pub dimensions: Vec<Dimension>,
    pub vectors: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Reject non-finite coordinates and ragged rows.
    pub fn validate(&self) -> Result<()> {
        let width = self.dimensions.len();
        for (i, vector) in self.vectors.iter().enumerate() {
            if vector.len() != width {
                return Err(AnalyticsError::InvalidVector(format!(
                    "record {} has {} coordinates, expected {}",
                    i,
                    vector.len(),
                    width
                )));
            }
            if let Some(bad) = vector.iter().position(|v| !v.is_finite()) {
                return Err(AnalyticsError::InvalidVector(format!(
                    "record {} has a non-finite value in '{}'",
                    i, self.dimensions[bad].column
                )));
            }
        }
        Ok(())
    }
}

/// Hash a categorical value into `[0, 1)`.
pub(crate) fn hash_value(text: &str) -> f64 {
    (fnv1a_64(text) % HASH_BUCKETS) as f64 / HASH_BUCKETS as f64
}

fn present_number(value: &Scalar) -> Option<f64> {
    if value.is_missing() {
        None
    } else {
        value.as_f64()
    }
}

fn encoding_for(dataset: &Dataset, column: &str) -> Encoding {
    let mut present = 0usize;
    let mut numbers = Vec::new();
    for value in dataset.column_values(column).filter(|v| !v.is_missing()) {
        present += 1;
        if let Some(n) = value.as_f64() {
            numbers.push(n);
        }
    }

    if present == 0 || (numbers.len() as f64 / present as f64) < NUMERIC_COLUMN_SHARE {
        return Encoding::Hashed;
    }

    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Encoding::Numeric { min, max }
}

fn encode(value: &Scalar, encoding: &Encoding) -> f64 {
    match encoding {
        Encoding::Numeric { min, max } => match present_number(value) {
            Some(v) if max > min => (v - min) / (max - min),
            _ => 0.0,
        },
        Encoding::Hashed if value.is_missing() => 0.0,
        Encoding::Hashed => hash_value(value.to_text().trim()),
    }
}

/// Encode every record as one coordinate per column.
///
/// Missing numeric values become 0.
pub(crate) fn vectorize(dataset: &Dataset) -> FeatureMatrix {
    let dimensions: Vec<Dimension> = dataset
        .columns()
        .iter()
        .map(|column| Dimension {
            column: column.clone(),
            encoding: encoding_for(dataset, column),
        })
        .collect();

    let vectors = dataset
        .records()
        .iter()
        .map(|record| {
            dimensions
                .iter()
                .map(|dim| encode(record.get(&dim.column), &dim.encoding))
                .collect()
        })
        .collect();

    FeatureMatrix {
        dimensions,
        vectors,
    }
}
