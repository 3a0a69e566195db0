//! Heuristic text derived from a confidence distribution.

use crate::types::{DatasetProfile, Domain, Priority, Recommendation};

/// Columns missing more than this share of values are called out.
const MISSING_CALLOUT_PERCENT: f64 = 20.0;
/// Columns whose dominant type covers less than this share of values are mixed.
const MIXED_TYPE_SHARE: f64 = 0.9;

/// Inputs shared by every narrative builder.
pub(crate) struct Summary<'a> {
    pub domain: &'a Domain,
    pub profile: &'a DatasetProfile,
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub average_confidence: f64,
    /// Numeric columns with values more than 3 standard deviations out.
    pub extreme_columns: Vec<String>,
}

impl Summary<'_> {
    fn sparse_columns(&self) -> impl Iterator<Item = (&str, f64)> {
        self.profile
            .column_profiles
            .iter()
            .filter(|c| c.missing_percentage > MISSING_CALLOUT_PERCENT)
            .map(|c| (c.name.as_str(), c.missing_percentage))
    }

    fn mixed_type_columns(&self) -> impl Iterator<Item = &str> {
        self.profile.column_profiles.iter().filter_map(|c| {
            let present: usize = c.type_counts.values().sum();
            let dominant = c.type_counts.get(&c.dominant_type).copied().unwrap_or(0);
            (present > 0 && (dominant as f64 / present as f64) < MIXED_TYPE_SHARE)
                .then_some(c.name.as_str())
        })
    }
}

pub(crate) fn analysis(summary: &Summary<'_>) -> String {
    let assessment = if summary.high >= 60 {
        "Overall data reliability is strong."
    } else if summary.low >= 40 {
        "Overall data reliability is weak and results should be treated with caution."
    } else {
        "Overall data reliability is moderate."
    };

    let domain_note = match summary.domain {
        Domain::Demographic => {
            "Population estimates drawn from low-confidence records may misstate group sizes."
        }
        Domain::Healthcare => {
            "Clinical conclusions based on low-confidence patient records require verification."
        }
        Domain::QualityOfLife => {
            "Well-being indicators are sensitive to incomplete self-reported answers."
        }
        Domain::Educational => {
            "Learner outcome comparisons depend on consistent assessment records."
        }
        Domain::Other(_) => "Low-confidence records should be reviewed before drawing conclusions.",
    };

    format!(
        "Confidence analysis of {} {} records in the {} domain: {}% high, {}% medium and {}% low confidence (average {:.1}). {} {}",
        summary.profile.row_count,
        summary.domain.subject(),
        summary.domain.display_name(),
        summary.high,
        summary.medium,
        summary.low,
        summary.average_confidence,
        assessment,
        domain_note
    )
}

pub(crate) fn patterns(summary: &Summary<'_>) -> Vec<String> {
    let subject = summary.domain.subject();
    let mut patterns = Vec::new();

    if summary.high > 50 {
        patterns.push(format!(
            "Most {} records are consistent with their column profiles",
            subject
        ));
    }
    if summary.medium > 40 {
        patterns.push("Many records are only partially reliable".to_string());
    }
    if summary.low > 30 {
        patterns.push(format!(
            "A substantial share of {} records has missing or inconsistent values",
            subject
        ));
    }
    for (name, missing) in summary.sparse_columns() {
        patterns.push(format!("Column '{}' is missing in {:.1}% of records", name, missing));
    }
    for name in &summary.extreme_columns {
        patterns.push(format!("Column '{}' contains values far from its mean", name));
    }

    if patterns.is_empty() {
        patterns.push("No dominant confidence pattern detected".to_string());
    }
    patterns
}

pub(crate) fn uncertainty_factors(summary: &Summary<'_>) -> Vec<String> {
    let mut factors: Vec<String> = summary
        .sparse_columns()
        .map(|(name, _)| format!("High missing-value rate in '{}'", name))
        .collect();

    factors.extend(
        summary
            .mixed_type_columns()
            .map(|name| format!("Mixed value types in '{}'", name)),
    );

    if summary.profile.duplicate_count > 0 {
        factors.push(format!(
            "{} duplicate records may bias the distribution",
            summary.profile.duplicate_count
        ));
    }

    if summary.low > 20 {
        factors.push(
            match summary.domain {
                Domain::Demographic => "Census-style attributes may be outdated or self-reported",
                Domain::Healthcare => "Clinical measurements may be recorded inconsistently",
                Domain::QualityOfLife => "Subjective survey answers vary between respondents",
                Domain::Educational => "Assessment scales may differ between institutions",
                Domain::Other(_) => "Source collection procedures are unknown",
            }
            .to_string(),
        );
    }

    factors
}

pub(crate) fn recommendations(summary: &Summary<'_>) -> Vec<Recommendation> {
    let subject = summary.domain.subject();
    let mut recommendations = Vec::new();

    if summary.low > 30 {
        recommendations.push(Recommendation::new(
            Priority::High,
            format!("Validate and clean low-confidence {} records", subject),
            format!("{}% of records score below 40", summary.low),
        ));
    }
    if summary.medium > 40 {
        recommendations.push(Recommendation::new(
            Priority::Medium,
            "Review partially reliable records before using them in decisions",
            format!("{}% of records fall in the medium confidence band", summary.medium),
        ));
    }
    for (name, missing) in summary.sparse_columns() {
        recommendations.push(Recommendation::new(
            Priority::Medium,
            format!("Collect or impute missing values in '{}'", name),
            format!("{:.1}% of values are missing", missing),
        ));
    }
    if summary.high > 70 {
        recommendations.push(Recommendation::new(
            Priority::Low,
            "Proceed with analysis using the high-confidence records",
            format!("{}% of records score 70 or above", summary.high),
        ));
    }

    if recommendations.is_empty() {
        recommendations.push(Recommendation::new(
            Priority::Low,
            "Continue monitoring data quality",
            "No confidence threshold was exceeded",
        ));
    }
    recommendations
}
