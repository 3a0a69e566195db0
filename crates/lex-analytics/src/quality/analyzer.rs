use crate::profiler::{DataProfiler, abs_z_score, numeric_values};
use crate::record::Dataset;
use crate::types::{DatasetProfile, ProfileOutcome, QualityMetrics};
use crate::utils::{percentage, round_to};
use std::collections::BTreeMap;
use tracing::debug;

/// A numeric cell is an outlier when its |z-score| exceeds this value.
pub const OUTLIER_Z_THRESHOLD: f64 = 2.5;

pub struct DataQualityAnalyzer;

impl DataQualityAnalyzer {
    /// Profile the dataset and compute its quality metrics.
    ///
    /// An empty dataset yields all-zero metrics.
    pub fn analyze(dataset: &Dataset) -> QualityMetrics {
        match DataProfiler::profile_dataset(dataset) {
            ProfileOutcome::Profiled(profile) => Self::analyze_with_profile(dataset, &profile),
            ProfileOutcome::EmptyDataset => QualityMetrics::default(),
        }
    }

    /// Compute quality metrics reusing an existing profile.
    pub fn analyze_with_profile(dataset: &Dataset, profile: &DatasetProfile) -> QualityMetrics {
        let total_cells = dataset.total_cells();
        if total_cells == 0 {
            return QualityMetrics::default();
        }

        let missing_values: usize = profile.column_profiles.iter().map(|c| c.missing_count).sum();
        let column_outliers = Self::count_outliers(dataset, profile);
        let outliers: usize = column_outliers.values().sum();
        let duplicates = dataset.duplicate_count();

        let filled = total_cells.saturating_sub(missing_values);
        let accurate = total_cells.saturating_sub(missing_values + outliers);

        let completeness = round_to(percentage(filled, total_cells), 2).clamp(0.0, 100.0);
        let accuracy = round_to(percentage(accurate, total_cells), 2).clamp(0.0, 100.0);

        debug!(
            "Quality: completeness {:.2}%, accuracy {:.2}%, {} missing, {} outliers, {} duplicates",
            completeness, accuracy, missing_values, outliers, duplicates
        );

        QualityMetrics {
            completeness,
            accuracy,
            missing_values,
            outliers,
            duplicates,
            total_cells,
            duplicate_percentage: round_to(percentage(duplicates, dataset.len()), 2),
            column_outliers,
        }
    }

    /// Count |z| > 2.5 cells in every numeric column.
    ///
    /// Zero-variance columns have no outliers.
    fn count_outliers(dataset: &Dataset, profile: &DatasetProfile) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();

        for column in profile.numeric_columns() {
            let Some(stats) = column.statistics else {
                continue;
            };
            let count = numeric_values(dataset.column_values(&column.name))
                .into_iter()
                .filter(|v| abs_z_score(*v, &stats) > OUTLIER_Z_THRESHOLD)
                .count();
            counts.insert(column.name.clone(), count);
        }

        counts
    }
}
