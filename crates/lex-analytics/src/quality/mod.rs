//! Data quality analysis module.
//!
//! This module aggregates column profiles into dataset-level quality
//! metrics: completeness, accuracy, missing cells, outliers and duplicates.

mod analyzer;

pub use analyzer::{DataQualityAnalyzer, OUTLIER_Z_THRESHOLD};
