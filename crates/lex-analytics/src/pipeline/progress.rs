//! Progress reporting and cancellation support for analytics runs.
//!
//! A run reports [`ProgressUpdate`]s through a [`ProgressReporter`] and can
//! be stopped from another thread (e.g., a UI cancel button) through a
//! shared [`CancellationToken`].
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_analytics::{AnalyticsEngine, CancellationToken};
//!
//! let token = CancellationToken::new();
//! let token_clone = token.clone();
//!
//! std::thread::spawn(move || {
//!     std::thread::sleep(std::time::Duration::from_secs(5));
//!     token_clone.cancel();
//! });
//!
//! let report = AnalyticsEngine::builder()
//!     .cancellation_token(token)
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .run(&dataset);
//! ```

use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Stages of an analytics run.
///
/// Quality, synthetic, fuzzy and clustering stages run concurrently, so
/// their updates may interleave. Overall progress is therefore an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    /// Validating configuration and input
    Initializing,
    /// Type inference and column statistics
    Profiling,
    /// Completeness, accuracy, outliers and duplicates
    QualityAnalysis,
    /// Generating synthetic records
    SyntheticGeneration,
    /// Scoring record confidence
    FuzzyScoring,
    /// Vectorizing and clustering records
    Clustering,
    /// Building ranked scenarios
    ScenarioSynthesis,
    /// Run completed successfully
    Complete,
    /// Run was cancelled by the caller
    Cancelled,
    /// Run failed with an error
    Failed,
}

impl AnalysisStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::Profiling => "Profiling Dataset",
            Self::QualityAnalysis => "Analyzing Quality",
            Self::SyntheticGeneration => "Generating Synthetic Records",
            Self::FuzzyScoring => "Scoring Confidence",
            Self::Clustering => "Clustering Records",
            Self::ScenarioSynthesis => "Synthesizing Scenarios",
            Self::Complete => "Complete",
            Self::Cancelled => "Cancelled",
            Self::Failed => "Failed",
        }
    }

    /// Share of the whole run attributed to this stage (0.0 - 1.0).
    ///
    /// Non-terminal weights sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Initializing => 0.02,
            Self::Profiling => 0.10,
            Self::QualityAnalysis => 0.10,
            Self::SyntheticGeneration => 0.15,
            Self::FuzzyScoring => 0.20,
            Self::Clustering => 0.30,
            Self::ScenarioSynthesis => 0.13,
            Self::Complete | Self::Cancelled | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Initializing => 0.0,
            Self::Profiling => 0.02,
            Self::QualityAnalysis => 0.12,
            Self::SyntheticGeneration => 0.22,
            Self::FuzzyScoring => 0.37,
            Self::Clustering => 0.57,
            Self::ScenarioSynthesis => 0.87,
            Self::Complete => 1.0,
            Self::Cancelled | Self::Failed => 0.0,
        }
    }
}

/// Progress update emitted during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: AnalysisStage,

    /// Optional detail (e.g., "Iteration 12/100")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within the current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: AnalysisStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let stage_progress = stage_progress.clamp(0.0, 1.0);
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            sub_stage: None,
            progress: progress.clamp(0.0, 1.0),
            stage_progress,
            message: message.into(),
        }
    }

    pub fn with_sub_stage(
        stage: AnalysisStage,
        sub_stage: impl Into<String>,
        stage_progress: f32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sub_stage: Some(sub_stage.into()),
            ..Self::new(stage, stage_progress, message)
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: AnalysisStage::Complete,
            sub_stage: None,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            stage: AnalysisStage::Cancelled,
            sub_stage: None,
            progress: 0.0,
            stage_progress: 0.0,
            message: "Analysis cancelled by user".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: AnalysisStage::Failed,
            sub_stage: None,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receiver of progress updates.
///
/// Implementations must be `Send + Sync`: concurrent stages report from
/// their own worker threads.
pub trait ProgressReporter: Send + Sync {
    /// Called at stage boundaries. Implementations should not block.
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

/// Token for cancelling a running analysis.
///
/// Clones share one atomic flag. Clustering loops poll it between
/// iterations and stop with [`AnalyticsError::Cancelled`].
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(CancellationToken: Send, Sync);
static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. Safe to call from any thread.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether [`cancel()`](Self::cancel) was called on this token or a clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once cancellation has been requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(AnalyticsError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_cancellation_token_clone_shares_state() {
        let token1 = CancellationToken::new();
        let token2 = token1.clone();
        assert!(!token2.is_cancelled());

        token1.cancel();
        assert!(token2.is_cancelled());
        assert!(matches!(token2.check(), Err(AnalyticsError::Cancelled)));
        assert!(CancellationToken::new().check().is_ok());
    }

    #[test]
    fn test_progress_update_new() {
        let update = ProgressUpdate::new(AnalysisStage::Clustering, 0.5, "Clustering...");
        assert_eq!(update.stage, AnalysisStage::Clustering);
        assert!(update.sub_stage.is_none());
        assert_eq!(update.stage_progress, 0.5);
        assert!((update.progress - 0.72).abs() < 1e-6);
    }

    #[test]
    fn test_progress_update_with_sub_stage() {
        let update = ProgressUpdate::with_sub_stage(
            AnalysisStage::Clustering,
            "Iteration 3/100",
            0.03,
            "Refining centers",
        );
        assert_eq!(update.sub_stage, Some("Iteration 3/100".to_string()));
        assert_eq!(update.message, "Refining centers");
    }

    #[test]
    fn test_stage_weights_sum() {
        let stages = [
            AnalysisStage::Initializing,
            AnalysisStage::Profiling,
            AnalysisStage::QualityAnalysis,
            AnalysisStage::SyntheticGeneration,
            AnalysisStage::FuzzyScoring,
            AnalysisStage::Clustering,
            AnalysisStage::ScenarioSynthesis,
        ];
        let total_weight: f32 = stages.iter().map(|s| s.weight()).sum();
        assert!((total_weight - 1.0).abs() < 0.01, "Weights should sum to ~1.0");

        // each stage starts where the previous one ends
        for pair in stages.windows(2) {
            let end = pair[0].base_progress() + pair[0].weight();
            assert!((end - pair[1].base_progress()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_stage_json_values() {
        let json = serde_json::to_string(&AnalysisStage::ScenarioSynthesis).unwrap();
        assert_eq!(json, "\"scenario_synthesis\"");
        let json = serde_json::to_string(&AnalysisStage::FuzzyScoring).unwrap();
        assert_eq!(json, "\"fuzzy_scoring\"");
    }

    #[test]
    fn test_progress_reporter_across_threads() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = Arc::new(ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let reporter_clone = reporter.clone();
        let handle = std::thread::spawn(move || {
            reporter_clone.report(ProgressUpdate::complete("Done"));
        });

        handle.join().expect("Thread should not panic");
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
