//! Field- and record-level confidence heuristics.

use crate::profiler::{EMAIL_PATTERN, abs_z_score, detect_value_type, is_date_string};
use crate::record::{Record, Scalar};
use crate::types::{ColumnProfile, DatasetProfile, RowConfidence};
use crate::utils::{mean, percentage};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s\-()]{7,}$").expect("Invalid regex: phone"));

const BASE_CONFIDENCE: f64 = 50.0;
const TYPE_MATCH_BONUS: f64 = 20.0;
const TYPE_MISMATCH_PENALTY: f64 = -15.0;
const FORMAT_BONUS: f64 = 15.0;
const SHAPE_BONUS: f64 = 5.0;

/// Format a column name implies for its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImpliedFormat {
    Email,
    Phone,
    Date,
}

fn implied_format(column: &str) -> Option<ImpliedFormat> {
    let name = column.to_lowercase();
    if name.contains("email") || name.contains("mail") {
        Some(ImpliedFormat::Email)
    } else if name.contains("phone") || name.contains("tel") {
        Some(ImpliedFormat::Phone)
    } else if name.contains("date") {
        Some(ImpliedFormat::Date)
    } else {
        None
    }
}

fn format_bonus(column: &str, text: &str) -> f64 {
    let valid = match implied_format(column) {
        Some(ImpliedFormat::Email) => EMAIL_PATTERN.is_match(text),
        Some(ImpliedFormat::Phone) => PHONE_PATTERN.is_match(text),
        Some(ImpliedFormat::Date) => is_date_string(text),
        None => false,
    };
    if valid { FORMAT_BONUS } else { 0.0 }
}

fn uniqueness_adjustment(ratio: f64) -> f64 {
    if ratio > 0.8 {
        10.0
    } else if ratio < 0.1 {
        -10.0
    } else {
        5.0
    }
}

fn z_score_adjustment(z: f64) -> f64 {
    if z <= 2.0 {
        10.0
    } else if z <= 3.0 {
        -10.0
    } else {
        -20.0
    }
}

/// Confidence in a single field value, in [0, 100].
///
/// Missing values score 0.
pub(crate) fn field_confidence(column: &ColumnProfile, row_count: usize, value: &Scalar) -> f64 {
    if value.is_missing() {
        return 0.0;
    }

    let mut score = BASE_CONFIDENCE;

    let detected = detect_value_type(value);
    let type_matches =
        detected == column.dominant_type || (detected.is_numeric() && column.is_numeric());
    score += if type_matches {
        TYPE_MATCH_BONUS
    } else {
        TYPE_MISMATCH_PENALTY
    };

    score += uniqueness_adjustment(column.uniqueness_ratio(row_count));

    if column.is_numeric() {
        if let (Some(v), Some(stats)) = (value.as_f64(), column.statistics.as_ref()) {
            score += z_score_adjustment(abs_z_score(v, stats));
        }
    } else {
        let text = value.to_text();
        let text = text.trim();
        score += format_bonus(&column.name, text);
        if (2..=100).contains(&text.chars().count()) {
            score += SHAPE_BONUS;
        }
        if text.chars().all(|c| !c.is_control() && c != char::REPLACEMENT_CHARACTER) {
            score += SHAPE_BONUS;
        }
    }

    score.clamp(0.0, 100.0)
}

/// Confidence of one record: the mean of its field confidences.
pub(crate) fn row_confidence(record: &Record, profile: &DatasetProfile) -> RowConfidence {
    let mut field_confidences = BTreeMap::new();
    let mut filled = 0;

    for column in &profile.column_profiles {
        let value = record.get(&column.name);
        if !value.is_missing() {
            filled += 1;
        }
        field_confidences.insert(
            column.name.clone(),
            field_confidence(column, profile.row_count, value),
        );
    }

    let scores: Vec<f64> = field_confidences.values().copied().collect();
    RowConfidence {
        confidence: mean(&scores).unwrap_or(0.0),
        field_confidences,
        completeness: percentage(filled, profile.column_profiles.len()),
    }
}

/// Convert bucket counts into whole percentages summing to exactly 100.
///
/// Uses largest-remainder rounding; ties go to the earlier bucket.
pub(crate) fn distribute_percentages(counts: [usize; 3], total: usize) -> [u32; 3] {
    if total == 0 {
        return [0; 3];
    }

    let mut shares = [0u32; 3];
    let mut remainders = [(0usize, 0usize); 3];
    for (i, count) in counts.iter().enumerate() {
        let scaled = count * 100;
        shares[i] = (scaled / total) as u32;
        remainders[i] = (scaled % total, i);
    }

    let assigned: u32 = shares.iter().sum();
    let missing = 100u32.saturating_sub(assigned) as usize;
    // larger remainder first, then lower index
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for (_, i) in remainders.iter().take(missing) {
        shares[*i] += 1;
    }

    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::DataProfiler;
    use crate::record;
    use crate::record::Dataset;

    fn profile_of(dataset: &Dataset) -> DatasetProfile {
        DataProfiler::require_profile(dataset).unwrap()
    }

    #[test]
    fn test_numeric_field_confidence() {
        let dataset = Dataset::from_records(vec![
            record! { "age" => "25" },
            record! { "age" => "30" },
        ]);
        let profile = profile_of(&dataset);
        let age = profile.column("age").unwrap();
        // base 50, type +20, uniqueness +10, z <= 2 +10
        assert_eq!(field_confidence(age, 2, &Scalar::from("25")), 90.0);
        assert_eq!(field_confidence(age, 2, &Scalar::Null), 0.0);
        // text in a numeric column: 50 - 15 + 10
        assert_eq!(field_confidence(age, 2, &Scalar::from("n/a")), 45.0);
    }

    #[test]
    fn test_text_field_confidence() {
        let dataset = Dataset::from_records(vec![
            record! { "city" => "Yerevan" },
            record! { "city" => "Gyumri" },
            record! { "city" => "Yerevan" },
        ]);
        let profile = profile_of(&dataset);
        let city = profile.column("city").unwrap();
        // 50 + 20 + 5 (ratio 2/3) + 5 length + 5 charset
        assert_eq!(field_confidence(city, 3, &Scalar::from("Yerevan")), 85.0);
    }

    #[test]
    fn test_email_format_bonus_clamps_to_100() {
        let dataset = Dataset::from_records(vec![
            record! { "email" => "anna@example.am" },
            record! { "email" => "aram@example.am" },
        ]);
        let profile = profile_of(&dataset);
        let email = profile.column("email").unwrap();
        assert_eq!(field_confidence(email, 2, &Scalar::from("anna@example.am")), 100.0);
    }

    #[test]
    fn test_phone_and_date_formats() {
        assert_eq!(format_bonus("Phone", "+374 10 123456"), FORMAT_BONUS);
        assert_eq!(format_bonus("phone", "call me"), 0.0);
        assert_eq!(format_bonus("birth_date", "2001-02-03"), FORMAT_BONUS);
        assert_eq!(format_bonus("city", "2001-02-03"), 0.0);
    }

    #[test]
    fn test_row_confidence_is_mean_of_fields() {
        let dataset = Dataset::from_records(vec![
            record! { "age" => "25", "income" => "1000" },
            record! { "age" => "30", "income" => "1200" },
            record! { "age" => Scalar::Null, "income" => "900" },
        ]);
        let profile = profile_of(&dataset);

        let first = row_confidence(&dataset.records()[0], &profile);
        assert_eq!(first.confidence, 90.0);
        assert_eq!(first.completeness, 100.0);

        let third = row_confidence(&dataset.records()[2], &profile);
        assert_eq!(third.field_confidences.get("age"), Some(&0.0));
        assert_eq!(third.confidence, 45.0);
        assert_eq!(third.completeness, 50.0);
    }

    #[test]
    fn test_far_outlier_in_low_uniqueness_column() {
        let mut records: Vec<Record> = (0..40).map(|i| record! { "visits" => i % 2 }).collect();
        records.push(record! { "visits" => 100 });
        let dataset = Dataset::from_records(records);
        let profile = profile_of(&dataset);
        let visits = profile.column("visits").unwrap();
        assert!(visits.uniqueness_ratio(41) < 0.1);

        // z(100) ~ 6.3: 50 + 20 - 10 (3 distinct of 41) - 20
        assert_eq!(field_confidence(visits, 41, &Scalar::Int(100)), 40.0);
        // z(0) ~ 0.2: 50 + 20 - 10 + 10
        assert_eq!(field_confidence(visits, 41, &Scalar::Int(0)), 70.0);
    }

    #[test]
    fn test_moderate_outlier_penalty() {
        let mut records: Vec<Record> = (0..6).map(|_| record! { "visits" => 0 }).collect();
        records.push(record! { "visits" => 10 });
        let dataset = Dataset::from_records(records);
        let profile = profile_of(&dataset);
        let visits = profile.column("visits").unwrap();

        // z(10) = sqrt(6) ~ 2.45: 50 + 20 + 5 (2 distinct of 7) - 10
        assert_eq!(field_confidence(visits, 7, &Scalar::Int(10)), 65.0);
        assert_eq!(field_confidence(visits, 7, &Scalar::Int(0)), 85.0);
    }

    #[test]
    fn test_adjustment_band_edges() {
        assert_eq!(z_score_adjustment(2.0), 10.0);
        assert_eq!(z_score_adjustment(2.01), -10.0);
        assert_eq!(z_score_adjustment(3.0), -10.0);
        assert_eq!(z_score_adjustment(3.01), -20.0);
        assert_eq!(uniqueness_adjustment(0.09), -10.0);
        assert_eq!(uniqueness_adjustment(0.1), 5.0);
        assert_eq!(uniqueness_adjustment(0.8), 5.0);
        assert_eq!(uniqueness_adjustment(0.81), 10.0);
    }

    #[test]
    fn test_distribute_percentages_sums_to_100() {
        assert_eq!(distribute_percentages([0, 1, 2], 3), [0, 33, 67]);
        assert_eq!(distribute_percentages([1, 1, 1], 3), [34, 33, 33]);
        assert_eq!(distribute_percentages([0, 0, 7], 7), [0, 0, 100]);
        assert_eq!(distribute_percentages([0, 0, 0], 0), [0, 0, 0]);
        let shares = distribute_percentages([3, 5, 9], 17);
        assert_eq!(shares.iter().sum::<u32>(), 100);
    }
}
