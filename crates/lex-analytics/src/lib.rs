//! Tabular Analytics Engine Library
//!
//! A dependency-light analytics engine for heterogeneous tabular records,
//! built with Rust. Everything runs in-process; no data leaves the machine.
//!
//! # Overview
//!
//! Given a [`Dataset`] and a declared [`Domain`], the engine produces:
//!
//! - **Profiling**: Per-column type inference and numeric statistics
//! - **Quality Analysis**: Completeness, accuracy, outliers and duplicates
//! - **Synthetic Records**: New records that mimic the source distributions
//! - **Fuzzy Confidence**: Per-record confidence in three buckets with narrative
//! - **Clustering**: K-Means++, hierarchical or DBSCAN grouping with labels
//! - **Scenarios**: Ranked planning scenarios from templates and results
//! - **Progress Reporting**: Stage updates with cancellation support
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_analytics::{AnalyticsConfig, AnalyticsEngine, Dataset, record};
//!
//! let dataset = Dataset::from_records(vec![
//!     record! { "age" => 25, "income" => 1000 },
//!     record! { "age" => 30, "income" => 1200 },
//!     record! { "age" => 35, "income" => 900 },
//! ]);
//!
//! let config = AnalyticsConfig::builder()
//!     .domain("demographic")
//!     .cluster_count(2)
//!     .seed(42)
//!     .build()?;
//!
//! let report = AnalyticsEngine::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run(&dataset)?;
//!
//! println!("Completeness: {}%", report.quality.completeness);
//! println!("Confidence: {}/{}/{}", report.fuzzy.low, report.fuzzy.medium, report.fuzzy.high);
//! ```
//!
//! # Fallbacks
//!
//! Only an empty dataset and cancellation fail a run. Fuzzy scoring,
//! clustering and scenario synthesis return an [`Analysis`]: on internal
//! errors they substitute a documented fallback value and keep the cause,
//! which the engine lists in [`AnalyticsReport::fallbacks`].
//!
//! Each component can also be used on its own:
//!
//! ```rust,ignore
//! use lex_analytics::{AnalysisExt, Domain, FuzzyScorer};
//!
//! let outcome = FuzzyScorer::score(&dataset, &Domain::Healthcare);
//! if let Some(cause) = outcome.cause() {
//!     eprintln!("fuzzy scoring fell back: {}", cause);
//! }
//! let fuzzy = outcome.value();
//! ```

pub mod clustering;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod pipeline;
pub mod profiler;
pub mod quality;
pub mod record;
pub mod scenario;
pub mod synthetic;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use clustering::ClusteringEngine;
pub use config::{
    AnalyticsConfig, AnalyticsConfigBuilder, ClusteringMethod, ClusteringSettings,
    ConfigValidationError, GenerationMethod, GenerationSettings,
};
pub use error::{
    Analysis, AnalysisExt, AnalyticsError, Diagnostic, Result as AnalyticsResult, ResultExt,
};
pub use fuzzy::FuzzyScorer;
pub use pipeline::{
    AnalysisStage, AnalyticsEngine, AnalyticsEngineBuilder, CancellationToken,
    ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
pub use profiler::DataProfiler;
pub use quality::DataQualityAnalyzer;
pub use record::{Dataset, Record, Scalar};
pub use scenario::ScenarioSynthesizer;
pub use synthetic::SyntheticGenerator;
pub use types::{
    AnalyticsReport, Cluster, ColumnProfile, ConfidenceBucket, DatasetProfile, Domain,
    DominantType, FuzzyResult, Priority, ProfileOutcome, QualityMetrics, Recommendation,
    RowConfidence, Scenario, ScenarioMetadata, StageFallback, Statistics, Timeframe,
};
