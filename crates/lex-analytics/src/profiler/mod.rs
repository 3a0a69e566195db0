//! Data profiling module for dataset analysis.
//!
//! This module provides functionality for profiling datasets, including:
//! - Per-value type detection and dominant-type selection per column
//! - Completeness and uniqueness counts
//! - Numeric statistics for numeric columns
//!
//! Profiling is the leaf of the pipeline: every other stage consumes the
//! [`DatasetProfile`] instead of re-inferring types on its own.

mod statistics;
mod type_inference;

use crate::error::{AnalyticsError, Result};
use crate::record::Dataset;
use crate::types::{ColumnProfile, DatasetProfile, ProfileOutcome};
use crate::utils::{percentage, round_to};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

pub(crate) use statistics::{abs_z_score, compute_statistics, numeric_values};
pub(crate) use type_inference::{EMAIL_PATTERN, is_date_string};
pub use type_inference::{detect_text_type, detect_value_type};

const SAMPLE_SIZE: usize = 5;

/// Data profiler for analyzing dataset structure and characteristics.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile an entire dataset.
    ///
    /// An empty dataset yields [`ProfileOutcome::EmptyDataset`] rather than
    /// an error, so callers can decide how to surface it.
    pub fn profile_dataset(dataset: &Dataset) -> ProfileOutcome {
        if dataset.is_empty() {
            debug!("Profiling skipped: dataset has no records");
            return ProfileOutcome::EmptyDataset;
        }

        let column_profiles: Vec<ColumnProfile> = dataset
            .columns()
            .iter()
            .map(|name| Self::profile_column(dataset, name))
            .collect();

        let duplicate_count = dataset.duplicate_count();

        for col in &column_profiles {
            debug!(
                "  {}: {} ({:.1}% missing, {} unique)",
                col.name, col.dominant_type, col.missing_percentage, col.unique_count
            );
        }

        ProfileOutcome::Profiled(DatasetProfile {
            row_count: dataset.len(),
            column_count: dataset.columns().len(),
            column_profiles,
            duplicate_count,
            duplicate_percentage: round_to(percentage(duplicate_count, dataset.len()), 2),
        })
    }

    /// Profile a dataset, treating the empty-dataset marker as an input error.
    pub fn require_profile(dataset: &Dataset) -> Result<DatasetProfile> {
        match Self::profile_dataset(dataset) {
            ProfileOutcome::Profiled(profile) => Ok(profile),
            ProfileOutcome::EmptyDataset => Err(AnalyticsError::EmptyDataset),
        }
    }

    fn profile_column(dataset: &Dataset, name: &str) -> ColumnProfile {
        let row_count = dataset.len();
        let mut missing_count = 0;
        let mut type_counts = BTreeMap::new();
        let mut distinct: HashSet<String> = HashSet::new();
        let mut sample_values = Vec::new();

        for value in dataset.column_values(name) {
            if value.is_missing() {
                missing_count += 1;
                continue;
            }
            *type_counts.entry(detect_value_type(value)).or_insert(0) += 1;

            let text = value.to_text().trim().to_string();
            if distinct.insert(text.clone()) && sample_values.len() < SAMPLE_SIZE {
                sample_values.push(text);
            }
        }

        let dominant_type = type_inference::dominant_type(&type_counts);
        let statistics = if dominant_type.is_numeric() {
            compute_statistics(&numeric_values(dataset.column_values(name)))
        } else {
            None
        };

        ColumnProfile {
            name: name.to_string(),
            dominant_type,
            missing_count,
            missing_percentage: percentage(missing_count, row_count),
            unique_count: distinct.len(),
            unique_percentage: percentage(distinct.len(), row_count),
            statistics,
            type_counts,
            sample_values,
        }
    }
}
