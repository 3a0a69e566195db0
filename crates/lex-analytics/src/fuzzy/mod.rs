//! Fuzzy confidence scoring.
//!
//! Every field gets a 0-100 confidence from heuristics over its column
//! profile (type consistency, uniqueness, distance from the mean, format
//! validity). Records average their fields and are bucketed into
//! low/medium/high; the bucket shares, plus text derived from them and the
//! declared domain, form the [`FuzzyResult`].
//!
//! Scoring never fails toward the caller: internal errors produce a
//! neutral `{33, 34, 33}` distribution carried in a [`Diagnostic`].
//!
//! [`Diagnostic`]: crate::error::Diagnostic

mod confidence;
mod narrative;

use crate::error::{Analysis, AnalyticsError, Result, recover};
use crate::profiler::{DataProfiler, abs_z_score, numeric_values};
use crate::record::Dataset;
use crate::types::{ConfidenceBucket, DatasetProfile, Domain, FuzzyResult, RowConfidence};
use crate::utils::{mean, round_to};
use tracing::{debug, info};

use confidence::{distribute_percentages, row_confidence};
use narrative::Summary;

/// Values beyond this |z| mark a column as containing extreme values.
const EXTREME_Z: f64 = 3.0;

pub struct FuzzyScorer;

impl FuzzyScorer {
    /// Score every record of `dataset`.
    ///
    /// An empty dataset yields `{0, 0, 0}` rather than an error.
    pub fn score(dataset: &Dataset, domain: &Domain) -> Analysis<FuzzyResult> {
        if dataset.is_empty() {
            debug!("Fuzzy scoring skipped: no records");
            return Ok(FuzzyResult::empty());
        }
        let result =
            DataProfiler::require_profile(dataset).and_then(|p| Self::try_score(dataset, &p, domain));
        recover("Fuzzy scoring", result, |cause| {
            FuzzyResult::fallback(dataset.len(), cause.to_string())
        })
    }

    /// Score reusing an existing profile of `dataset`.
    pub fn score_with_profile(
        dataset: &Dataset,
        profile: &DatasetProfile,
        domain: &Domain,
    ) -> Analysis<FuzzyResult> {
        if dataset.is_empty() {
            return Ok(FuzzyResult::empty());
        }
        recover("Fuzzy scoring", Self::try_score(dataset, profile, domain), |cause| {
            FuzzyResult::fallback(dataset.len(), cause.to_string())
        })
    }

    /// Per-record confidences, in dataset order.
    pub fn row_confidences(dataset: &Dataset, profile: &DatasetProfile) -> Vec<RowConfidence> {
        dataset
            .records()
            .iter()
            .map(|record| row_confidence(record, profile))
            .collect()
    }

    fn try_score(
        dataset: &Dataset,
        profile: &DatasetProfile,
        domain: &Domain,
    ) -> Result<FuzzyResult> {
        if profile.row_count != dataset.len() {
            return Err(AnalyticsError::InconsistentInput(format!(
                "profile covers {} records but the dataset has {}",
                profile.row_count,
                dataset.len()
            )));
        }
        if profile.column_profiles.is_empty() {
            return Err(AnalyticsError::InconsistentInput(
                "records have no columns".to_string(),
            ));
        }

        let rows = Self::row_confidences(dataset, profile);
        if let Some(bad) = rows.iter().position(|r| !r.confidence.is_finite()) {
            return Err(AnalyticsError::Internal(format!(
                "non-finite confidence for record {}",
                bad
            )));
        }

        let mut counts = [0usize; 3];
        for row in &rows {
            let slot = match row.bucket() {
                ConfidenceBucket::Low => 0,
                ConfidenceBucket::Medium => 1,
                ConfidenceBucket::High => 2,
            };
            counts[slot] += 1;
        }
        let [low, medium, high] = distribute_percentages(counts, rows.len());

        let scores: Vec<f64> = rows.iter().map(|r| r.confidence).collect();
        let average_confidence = round_to(mean(&scores).unwrap_or(0.0), 2);

        let summary = Summary {
            domain,
            profile,
            low,
            medium,
            high,
            average_confidence,
            extreme_columns: Self::extreme_columns(dataset, profile),
        };

        info!(
            "Fuzzy scoring: {}% low, {}% medium, {}% high over {} records",
            low,
            medium,
            high,
            rows.len()
        );

        Ok(FuzzyResult {
            low,
            medium,
            high,
            analysis: narrative::analysis(&summary),
            patterns: narrative::patterns(&summary),
            uncertainty_factors: narrative::uncertainty_factors(&summary),
            recommendations: narrative::recommendations(&summary),
            average_confidence,
            record_count: rows.len(),
            error: None,
        })
    }

    fn extreme_columns(dataset: &Dataset, profile: &DatasetProfile) -> Vec<String> {
        profile
            .numeric_columns()
            .filter(|column| {
                column.statistics.is_some_and(|stats| {
                    numeric_values(dataset.column_values(&column.name))
                        .into_iter()
                        .any(|v| abs_z_score(v, &stats) > EXTREME_Z)
                })
            })
            .map(|column| column.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisExt;
    use crate::record;
    use crate::record::{Record, Scalar};
    use pretty_assertions::assert_eq;

    fn sample_dataset() -> Dataset {
        Dataset::from_records(vec![
            record! { "age" => "25", "income" => "1000" },
            record! { "age" => "30", "income" => "1200" },
            record! { "age" => Scalar::Null, "income" => "900" },
        ])
    }

    #[test]
    fn test_empty_dataset_scores_zero() {
        let outcome = FuzzyScorer::score(&Dataset::default(), &Domain::Healthcare);
        assert!(!outcome.used_fallback());
        let result = outcome.value();
        assert_eq!((result.low, result.medium, result.high), (0, 0, 0));
        assert_eq!(result.record_count, 0);
    }

    #[test]
    fn test_distribution_for_sample() {
        let result = FuzzyScorer::score(&sample_dataset(), &Domain::Demographic).value();
        // two rows at 90, one at 45
        assert_eq!((result.low, result.medium, result.high), (0, 33, 67));
        assert_eq!(result.total(), 100);
        assert_eq!(result.average_confidence, 75.0);
        assert!(result.error.is_none());
        assert!(!result.recommendations.is_empty());
    }

    #[test]
    fn test_low_confidence_dataset() {
        let dataset = Dataset::from_records(vec![
            record! { "a" => Scalar::Null, "b" => Scalar::Null, "c" => "x" },
            record! { "a" => Scalar::Null, "b" => Scalar::Null, "c" => "y" },
            record! { "a" => "1", "b" => "2", "c" => "z" },
        ]);
        let result = FuzzyScorer::score(&dataset, &Domain::QualityOfLife).value();
        assert_eq!((result.low, result.medium, result.high), (67, 0, 33));
        assert_eq!(result.total(), 100);
        assert_eq!(result.recommendations[0].priority, crate::types::Priority::High);
    }

    #[test]
    fn test_records_without_columns_fall_back() {
        let dataset = Dataset::from_records(vec![Record::new(), Record::new()]);
        let outcome = FuzzyScorer::score(&dataset, &Domain::Demographic);
        assert!(outcome.used_fallback());
        assert_eq!(outcome.cause().map(|c| c.error_code()), Some("INCONSISTENT_INPUT"));

        let result = outcome.value();
        assert_eq!((result.low, result.medium, result.high), (33, 34, 33));
        assert!(result.analysis.starts_with("Error"));
        assert_eq!(result.record_count, 2);
    }

    #[test]
    fn test_mismatched_profile_falls_back() {
        let dataset = sample_dataset();
        let other = DataProfiler::require_profile(&Dataset::from_records(vec![
            record! { "age" => "1" },
        ]))
        .unwrap();
        let outcome = FuzzyScorer::score_with_profile(&dataset, &other, &Domain::Demographic);
        assert!(outcome.used_fallback());
    }

    #[test]
    fn test_row_confidences_in_dataset_order() {
        let dataset = sample_dataset();
        let profile = DataProfiler::require_profile(&dataset).unwrap();
        let rows = FuzzyScorer::row_confidences(&dataset, &profile);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].bucket(), ConfidenceBucket::Medium);
    }
}
