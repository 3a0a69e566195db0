use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyticsError;
use crate::pipeline::AnalysisStage;
use crate::record::Record;

// ============================================================================
// Domain
// ============================================================================

/// Subject area declared by the caller alongside the dataset.
///
/// Drives label pools, narrative phrasing and scenario templates. Any
/// unrecognised string is kept verbatim as [`Domain::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Domain {
    #[default]
    Demographic,
    Healthcare,
    QualityOfLife,
    Educational,
    Other(String),
}

impl Domain {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Demographic => "demographic",
            Self::Healthcare => "healthcare",
            Self::QualityOfLife => "quality_of_life",
            Self::Educational => "educational",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Human-readable name used in generated text.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Demographic => "demographic",
            Self::Healthcare => "healthcare",
            Self::QualityOfLife => "quality of life",
            Self::Educational => "educational",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Noun describing what one record is about.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Demographic => "population",
            Self::Healthcare => "patient",
            Self::QualityOfLife => "well-being",
            Self::Educational => "learner",
            Self::Other(_) => "record",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl FromStr for Domain {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Ok(match normalized.as_str() {
            "demographic" | "demographics" => Self::Demographic,
            "healthcare" | "health" => Self::Healthcare,
            "quality_of_life" => Self::QualityOfLife,
            "educational" | "education" => Self::Educational,
            _ => Self::Other(s.trim().to_string()),
        })
    }
}

impl From<String> for Domain {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(domain) => domain,
            Err(never) => match never {},
        }
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.as_str().to_string()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Profiling Types
// ============================================================================

/// Inferred scalar type of a value or a column.
///
/// Declaration order is the detection priority order; ties between
/// equally frequent types resolve toward the earlier variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DominantType {
    Empty,
    Integer,
    Float,
    Date,
    Email,
    Url,
    Boolean,
    Text,
}

impl DominantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Date => "date",
            Self::Email => "email",
            Self::Url => "url",
            Self::Boolean => "boolean",
            Self::Text => "text",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for DominantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric summary of a column (population standard deviation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dominant_type: DominantType,
    pub missing_count: usize,
    pub missing_percentage: f64,
    /// Distinct non-missing values.
    pub unique_count: usize,
    /// `unique_count` relative to the number of records.
    pub unique_percentage: f64,
    /// Present only when the dominant type is numeric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
    /// Frequency of each detected per-value type among non-missing values.
    pub type_counts: BTreeMap<DominantType, usize>,
    /// First few distinct non-missing values, in record order.
    pub sample_values: Vec<String>,
}

impl ColumnProfile {
    pub fn is_numeric(&self) -> bool {
        self.dominant_type.is_numeric()
    }

    pub fn present_count(&self, row_count: usize) -> usize {
        row_count.saturating_sub(self.missing_count)
    }

    /// Distinct values per non-missing value (0 when nothing is present).
    pub fn uniqueness_ratio(&self, row_count: usize) -> f64 {
        let present = self.present_count(row_count);
        if present == 0 {
            0.0
        } else {
            self.unique_count as f64 / present as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub row_count: usize,
    pub column_count: usize,
    pub column_profiles: Vec<ColumnProfile>,
    pub duplicate_count: usize,
    pub duplicate_percentage: f64,
}

impl DatasetProfile {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.column_profiles.iter().find(|c| c.name == name)
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnProfile> {
        self.column_profiles.iter().filter(|c| c.is_numeric())
    }
}

/// Result of profiling: either a profile or the explicit empty-dataset marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "profile", rename_all = "snake_case")]
pub enum ProfileOutcome {
    Profiled(DatasetProfile),
    EmptyDataset,
}

impl ProfileOutcome {
    pub fn profile(&self) -> Option<&DatasetProfile> {
        match self {
            Self::Profiled(profile) => Some(profile),
            Self::EmptyDataset => None,
        }
    }

    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, Self::EmptyDataset)
    }
}

// ============================================================================
// Quality Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Filled cells as a percentage of all cells, in [0, 100].
    pub completeness: f64,
    /// Cells neither missing nor outlying, as a percentage, in [0, 100].
    pub accuracy: f64,
    pub missing_values: usize,
    pub outliers: usize,
    pub duplicates: usize,
    pub total_cells: usize,
    pub duplicate_percentage: f64,
    /// Outlier count per numeric column.
    pub column_outliers: BTreeMap<String, usize>,
}

// ============================================================================
// Shared Priority
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Ranking weight: high = 3, medium = 2, low = 1.
    pub fn weight(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::High => "High priority",
            Self::Medium => "Medium priority",
            Self::Low => "Low priority",
        }
    }
}

// ============================================================================
// Fuzzy Confidence Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBucket {
    Low,
    Medium,
    High,
}

impl ConfidenceBucket {
    /// `< 40` low, `[40, 70)` medium, `>= 70` high.
    pub fn from_score(score: f64) -> Self {
        if score < 40.0 {
            Self::Low
        } else if score < 70.0 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub action: String,
    pub reason: String,
}

impl Recommendation {
    pub fn new(priority: Priority, action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            priority,
            action: action.into(),
            reason: reason.into(),
        }
    }
}

/// Confidence of a single record. Computed, aggregated, then discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowConfidence {
    pub confidence: f64,
    pub field_confidences: BTreeMap<String, f64>,
    /// Filled fields as a percentage of the record's columns.
    pub completeness: f64,
}

impl RowConfidence {
    pub fn bucket(&self) -> ConfidenceBucket {
        ConfidenceBucket::from_score(self.confidence)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyResult {
    /// Percentage of records with low confidence.
    pub low: u32,
    /// Percentage of records with medium confidence.
    pub medium: u32,
    /// Percentage of records with high confidence.
    pub high: u32,
    pub analysis: String,
    pub patterns: Vec<String>,
    pub uncertainty_factors: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub average_confidence: f64,
    pub record_count: usize,
    /// Set when the distribution is a neutral fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FuzzyResult {
    /// Result for a dataset with no records.
    pub fn empty() -> Self {
        Self {
            low: 0,
            medium: 0,
            high: 0,
            analysis: "No records available for confidence analysis.".to_string(),
            patterns: Vec::new(),
            uncertainty_factors: Vec::new(),
            recommendations: Vec::new(),
            average_confidence: 0.0,
            record_count: 0,
            error: None,
        }
    }

    /// Neutral distribution substituted when scoring fails.
    pub fn fallback(record_count: usize, cause: impl Into<String>) -> Self {
        let cause = cause.into();
        Self {
            low: 33,
            medium: 34,
            high: 33,
            analysis: format!(
                "Error: confidence analysis could not be completed ({}). A neutral distribution is shown.",
                cause
            ),
            patterns: Vec::new(),
            uncertainty_factors: vec!["Confidence scoring failed; values are placeholders".to_string()],
            recommendations: vec![Recommendation::new(
                Priority::High,
                "Re-run the confidence analysis after checking the input data",
                "The previous run did not produce a real distribution",
            )],
            average_confidence: 50.0,
            record_count,
            error: Some(cause),
        }
    }

    pub fn total(&self) -> u32 {
        self.low + self.medium + self.high
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

// ============================================================================
// Clustering Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: usize,
    pub label: String,
    pub size: usize,
    pub center: Vec<f64>,
    pub points: Vec<Record>,
    /// Positions of `points` in the input dataset.
    pub member_indices: Vec<usize>,
    /// Mean Euclidean norm of member vectors, ×100, rounded.
    pub avg_value: f64,
    /// Cohesion score in (0, 100]: `100 / (1 + mean distance to center)`.
    pub quality: f64,
}

// ============================================================================
// Scenario Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl Timeframe {
    pub fn display_text(&self) -> &'static str {
        match self {
            Self::ShortTerm => "Short term (1-3 months)",
            Self::MediumTerm => "Medium term (3-12 months)",
            Self::LongTerm => "Long term (1-3 years)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetadata {
    pub generated_at: DateTime<Utc>,
    pub data_type: String,
    /// High-confidence percentage of the fuzzy result used, if any.
    pub confidence: Option<u32>,
    /// Low-confidence percentage of the fuzzy result used, if any.
    pub uncertainty: Option<u32>,
    pub adaptive: bool,
    #[serde(default)]
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub timeframe: Timeframe,
    pub actions: Vec<String>,
    pub indicators: Vec<String>,
    pub risks: Vec<String>,
    pub adaptive: bool,
    pub priority_text: String,
    pub timeframe_text: String,
    pub metadata: ScenarioMetadata,
}

// ============================================================================
// Engine Report
// ============================================================================

/// A stage that substituted a fallback payload for its real result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFallback {
    pub stage: AnalysisStage,
    /// Error code of the swallowed cause.
    pub code: String,
    pub message: String,
}

impl StageFallback {
    pub fn new(stage: AnalysisStage, cause: &AnalyticsError) -> Self {
        Self {
            stage,
            code: cause.error_code().to_string(),
            message: cause.to_string(),
        }
    }
}

/// Everything one analytics run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub domain: Domain,
    pub profile: DatasetProfile,
    pub quality: QualityMetrics,
    /// `None` when generation was disabled or failed.
    pub synthetic: Option<Vec<Record>>,
    pub fuzzy: FuzzyResult,
    /// `None` when clustering was disabled.
    pub clusters: Option<Vec<Cluster>>,
    pub scenarios: Vec<Scenario>,
    pub fallbacks: Vec<StageFallback>,
    pub duration_ms: u64,
}

impl AnalyticsReport {
    pub fn used_fallback(&self) -> bool {
        !self.fallbacks.is_empty()
    }

    pub fn fallback_for(&self, stage: AnalysisStage) -> Option<&StageFallback> {
        self.fallbacks.iter().find(|f| f.stage == stage)
    }
}
