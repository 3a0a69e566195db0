//! The analytics engine: runs every stage over one dataset.
//!
//! Profiling runs first. Quality, synthetic generation, fuzzy scoring and
//! clustering then run concurrently on scoped threads over the shared,
//! immutable dataset and profile. Scenario synthesis joins on the fuzzy
//! and clustering results.

use crate::clustering::ClusteringEngine;
use crate::config::{AnalyticsConfig, ConfigValidationError};
use crate::error::{Analysis, AnalysisExt, AnalyticsError, Result};
use crate::fuzzy::FuzzyScorer;
use crate::pipeline::progress::{
    AnalysisStage, CancellationToken, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::profiler::DataProfiler;
use crate::quality::DataQualityAnalyzer;
use crate::record::{Dataset, Record};
use crate::scenario::ScenarioSynthesizer;
use crate::synthetic::SyntheticGenerator;
use crate::types::{AnalyticsReport, Cluster, DatasetProfile, StageFallback};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{error, info, warn};

/// Runs the full analytics pipeline.
///
/// Use [`AnalyticsEngine::builder()`] to create one.
///
/// # Example
///
/// ```rust,ignore
/// use lex_analytics::{AnalyticsConfig, AnalyticsEngine, Dataset};
///
/// let config = AnalyticsConfig::builder()
///     .domain("healthcare")
///     .cluster_count(3)
///     .seed(42)
///     .build()?;
///
/// let report = AnalyticsEngine::builder()
///     .config(config)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .run(&dataset)?;
///
/// println!("{}% high confidence", report.fuzzy.high);
/// ```
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cancellation_token: CancellationToken,
}

// Stages borrow the engine from worker threads
static_assertions::assert_impl_all!(AnalyticsEngine: Send, Sync);

impl AnalyticsEngine {
    pub fn builder() -> AnalyticsEngineBuilder {
        AnalyticsEngineBuilder::default()
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Analyze `dataset`.
    ///
    /// # Errors
    ///
    /// - [`AnalyticsError::EmptyDataset`] when the dataset has no records
    /// - [`AnalyticsError::Cancelled`] when the cancellation token fires
    ///
    /// Failures inside fuzzy scoring, clustering and scenario synthesis do
    /// not fail the run; they are listed in [`AnalyticsReport::fallbacks`].
    pub fn run(&self, dataset: &Dataset) -> Result<AnalyticsReport> {
        match self.run_internal(dataset) {
            Ok(report) => {
                self.report_progress(ProgressUpdate::complete("Analysis completed successfully"));
                Ok(report)
            }
            Err(e) => {
                if e.is_cancelled() {
                    self.report_progress(ProgressUpdate::cancelled());
                } else {
                    self.report_progress(ProgressUpdate::failed(e.to_string()));
                }
                error!("Analysis error: {}", e);
                Err(e)
            }
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        self.cancellation_token.check()
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn stage_started(&self, stage: AnalysisStage) {
        self.report_progress(ProgressUpdate::new(
            stage,
            0.0,
            format!("{}...", stage.display_name()),
        ));
    }

    fn method_started(&self, stage: AnalysisStage, method: &str) {
        self.report_progress(ProgressUpdate::with_sub_stage(
            stage,
            method,
            0.0,
            format!("{} ({})...", stage.display_name(), method),
        ));
    }

    fn stage_finished(&self, stage: AnalysisStage) {
        self.report_progress(ProgressUpdate::new(
            stage,
            1.0,
            format!("{} complete", stage.display_name()),
        ));
    }

    fn run_internal(&self, dataset: &Dataset) -> Result<AnalyticsReport> {
        let start_time = Instant::now();
        let domain = &self.config.domain;

        info!(
            "Starting analysis of {} records ({} domain)",
            dataset.len(),
            domain
        );
        self.stage_started(AnalysisStage::Initializing);
        self.check_cancelled()?;

        self.stage_started(AnalysisStage::Profiling);
        let profile = DataProfiler::require_profile(dataset)?;
        self.stage_finished(AnalysisStage::Profiling);
        self.check_cancelled()?;

        let (quality, synthetic, fuzzy, clusters) = thread::scope(|scope| {
            let quality = scope.spawn(|| {
                self.stage_started(AnalysisStage::QualityAnalysis);
                let metrics = DataQualityAnalyzer::analyze_with_profile(dataset, &profile);
                self.stage_finished(AnalysisStage::QualityAnalysis);
                metrics
            });
            let synthetic = scope.spawn(|| self.generate_synthetic(dataset, &profile));
            let fuzzy = scope.spawn(|| {
                self.stage_started(AnalysisStage::FuzzyScoring);
                let outcome = FuzzyScorer::score_with_profile(dataset, &profile, domain);
                self.stage_finished(AnalysisStage::FuzzyScoring);
                outcome
            });
            let clusters = scope.spawn(|| self.cluster(dataset));

            (
                join(quality, AnalysisStage::QualityAnalysis),
                join(synthetic, AnalysisStage::SyntheticGeneration),
                join(fuzzy, AnalysisStage::FuzzyScoring),
                join(clusters, AnalysisStage::Clustering),
            )
        });
        let (quality, synthetic, fuzzy, clusters) = (quality?, synthetic?, fuzzy?, clusters?);

        if clusters
            .as_ref()
            .and_then(|outcome| outcome.cause())
            .is_some_and(AnalyticsError::is_cancelled)
        {
            return Err(AnalyticsError::Cancelled);
        }
        self.check_cancelled()?;

        let mut fallbacks = Vec::new();
        collect_fallback(&mut fallbacks, AnalysisStage::FuzzyScoring, &fuzzy);
        if let Some(outcome) = &clusters {
            collect_fallback(&mut fallbacks, AnalysisStage::Clustering, outcome);
        }

        let fuzzy = fuzzy.value();
        let clusters: Option<Vec<Cluster>> = clusters.map(|outcome| outcome.value());

        self.stage_started(AnalysisStage::ScenarioSynthesis);
        let scenarios = ScenarioSynthesizer::synthesize(domain, Some(&fuzzy), clusters.as_deref());
        collect_fallback(&mut fallbacks, AnalysisStage::ScenarioSynthesis, &scenarios);
        self.stage_finished(AnalysisStage::ScenarioSynthesis);

        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            "Analysis finished in {} ms ({} fallbacks)",
            duration_ms,
            fallbacks.len()
        );

        Ok(AnalyticsReport {
            domain: domain.clone(),
            profile,
            quality,
            synthetic,
            fuzzy,
            clusters,
            scenarios: scenarios.value(),
            fallbacks,
            duration_ms,
        })
    }

    /// `None` when disabled. Generation errors are logged, not propagated.
    fn generate_synthetic(&self, dataset: &Dataset, profile: &DatasetProfile) -> Option<Vec<Record>> {
        if !self.config.run_synthetic {
            info!("Synthetic generation skipped (disabled)");
            return None;
        }

        self.method_started(
            AnalysisStage::SyntheticGeneration,
            self.config.generation.method.as_str(),
        );
        let generator = SyntheticGenerator::new(self.config.generation).with_seed(self.config.seed);
        let records = match generator.generate_with_profile(dataset, profile) {
            Ok(records) => Some(records),
            Err(e) => {
                warn!("Synthetic generation failed: {}", e);
                None
            }
        };
        self.stage_finished(AnalysisStage::SyntheticGeneration);
        records
    }

    fn cluster(&self, dataset: &Dataset) -> Option<Analysis<Vec<Cluster>>> {
        if !self.config.run_clustering {
            info!("Clustering skipped (disabled)");
            return None;
        }

        self.method_started(AnalysisStage::Clustering, self.config.clustering.method.as_str());
        let outcome = ClusteringEngine::new(self.config.clustering)
            .with_seed(self.config.seed)
            .with_cancellation(self.cancellation_token.clone())
            .cluster(dataset, &self.config.domain);
        self.stage_finished(AnalysisStage::Clustering);
        Some(outcome)
    }
}

/// Join a stage worker, mapping a panic to [`AnalyticsError::Internal`].
///
/// The dev and release profiles set `panic = "abort"`, so there a worker
/// panic ends the process before the join returns. The error is only
/// observed in unwinding builds such as the test harness.
fn join<T>(handle: thread::ScopedJoinHandle<'_, T>, stage: AnalysisStage) -> Result<T> {
    handle
        .join()
        .map_err(|_| AnalyticsError::Internal(format!("{} worker panicked", stage.display_name())))
}

fn collect_fallback<T>(fallbacks: &mut Vec<StageFallback>, stage: AnalysisStage, outcome: &Analysis<T>) {
    if let Some(cause) = outcome.cause() {
        fallbacks.push(StageFallback::new(stage, cause));
    }
}

/// Builder for [`AnalyticsEngine`].
#[derive(Default)]
pub struct AnalyticsEngineBuilder {
    config: Option<AnalyticsConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cancellation_token: Option<CancellationToken>,
}

static_assertions::assert_impl_all!(AnalyticsEngineBuilder: Send);

impl AnalyticsEngineBuilder {
    pub fn config(mut self, config: AnalyticsConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter, e.g. one that forwards updates to a UI.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// Concurrent stages call it from their worker threads.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Set a cancellation token for stopping the run.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Build the engine, validating the configuration.
    pub fn build(self) -> std::result::Result<AnalyticsEngine, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(AnalyticsEngine {
            config,
            progress_reporter: self.progress_reporter,
            cancellation_token: self.cancellation_token.unwrap_or_default(),
        })
    }
}
