//! Integration tests for the analytics engine.
//!
//! These tests verify end-to-end behavior of the engine and its components
//! using small in-memory datasets.

use lex_analytics::{
    AnalysisExt, AnalysisStage, AnalyticsConfig, AnalyticsEngine, AnalyticsError,
    CancellationToken, ClusteringEngine, ClusteringMethod, ClusteringSettings, DataProfiler,
    DataQualityAnalyzer, Dataset, Domain, DominantType, FuzzyScorer, GenerationMethod,
    GenerationSettings, ProgressUpdate, Scalar, ScenarioSynthesizer, SyntheticGenerator, record,
    utils::euclidean_distance,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Helper Functions
// ============================================================================

/// Three records with string-encoded numbers and one missing age.
fn age_income_dataset() -> Dataset {
    Dataset::from_records(vec![
        record! { "age" => "25", "income" => "1000" },
        record! { "age" => "30", "income" => "1200" },
        record! { "age" => Scalar::Null, "income" => "900" },
    ])
}

/// 100 numeric records in two well separated blobs.
fn two_blobs() -> Dataset {
    let records = (0..100)
        .map(|i| {
            let jitter = (i % 10) as f64 * 0.3;
            if i < 50 {
                record! { "x" => 1.0 + jitter, "y" => 2.0 + jitter }
            } else {
                record! { "x" => 100.0 + jitter, "y" => 80.0 - jitter }
            }
        })
        .collect();
    Dataset::from_records(records)
}

fn survey_dataset() -> Dataset {
    let cities = ["Yerevan", "Gyumri", "Vanadzor", "Dilijan"];
    let records = (0..60)
        .map(|i| {
            let mut r = record! {
                "id" => i + 1,
                "age" => 18 + (i * 7) % 60,
                "income" => 300.0 + ((i * 37) % 100) as f64 * 12.5,
                "city" => cities[(i % 4) as usize],
                "email" => format!("person{}@example.com", i),
            };
            if i % 9 == 0 {
                r.insert("income", Scalar::Null);
            }
            r
        })
        .collect();
    Dataset::from_records(records)
}

fn run_engine(config: AnalyticsConfig, dataset: &Dataset) -> lex_analytics::AnalyticsReport {
    AnalyticsEngine::builder()
        .config(config)
        .build()
        .expect("valid config")
        .run(dataset)
        .expect("analysis should succeed")
}

// ============================================================================
// Component Scenarios
// ============================================================================

#[test]
fn test_age_income_profile_and_quality() {
    let dataset = age_income_dataset();

    let profile = DataProfiler::require_profile(&dataset).unwrap();
    let age = profile.column("age").unwrap();
    assert_eq!(age.dominant_type, DominantType::Integer);
    assert!((age.missing_percentage - 33.33).abs() < 0.01);

    let quality = DataQualityAnalyzer::analyze(&dataset);
    assert_eq!(quality.missing_values, 1);
    assert_eq!(quality.total_cells, 6);
    assert!((quality.completeness - 83.33).abs() < 0.01);
}

#[test]
fn test_dataframe_ingestion_matches_records() {
    let df = df!(
        "age" => &[Some("25"), Some("30"), None],
        "income" => &["1000", "1200", "900"]
    )
    .unwrap();

    let dataset = Dataset::from_dataframe(&df).unwrap();
    assert_eq!(dataset.columns(), &["age".to_string(), "income".to_string()]);

    let profile = DataProfiler::require_profile(&dataset).unwrap();
    assert_eq!(profile, DataProfiler::require_profile(&age_income_dataset()).unwrap());
}

#[test]
fn test_profiler_is_idempotent() {
    let dataset = survey_dataset();
    assert_eq!(
        DataProfiler::profile_dataset(&dataset),
        DataProfiler::profile_dataset(&dataset)
    );
}

#[test]
fn test_kmeans_separates_two_blobs() {
    let dataset = two_blobs();
    let settings = ClusteringSettings {
        cluster_count: 2,
        method: ClusteringMethod::KMeans,
        max_iterations: 100,
    };

    let outcome = ClusteringEngine::new(settings)
        .with_seed(Some(42))
        .cluster(&dataset, &Domain::Demographic);
    assert!(!outcome.used_fallback());

    let clusters = outcome.value();
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters.iter().map(|c| c.size).sum::<usize>(), 100);
    assert!(euclidean_distance(&clusters[0].center, &clusters[1].center) > 0.5);

    let mut sizes: Vec<usize> = clusters.iter().map(|c| c.size).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![50, 50]);
}

#[test]
fn test_score_empty_dataset_is_safe() {
    let outcome = FuzzyScorer::score(&Dataset::default(), &Domain::Healthcare);
    assert!(!outcome.used_fallback());

    let fuzzy = outcome.value();
    assert_eq!((fuzzy.low, fuzzy.medium, fuzzy.high), (0, 0, 0));
    assert_eq!(fuzzy.record_count, 0);
}

#[test]
fn test_synthetic_generation_every_method() {
    let dataset = survey_dataset();
    for method in [
        GenerationMethod::Statistical,
        GenerationMethod::Pattern,
        GenerationMethod::Interpolation,
        GenerationMethod::MachineLearning,
    ] {
        let settings = GenerationSettings {
            count: 25,
            method,
            ..GenerationSettings::default()
        };
        let records = SyntheticGenerator::new(settings)
            .with_seed(Some(3))
            .generate(&dataset)
            .unwrap();

        assert_eq!(records.len(), 25, "method {}", method);
        assert!(records.iter().all(|r| r.columns().count() == 5), "method {}", method);
    }
}

#[test]
fn test_synthetic_without_source_records_is_an_error() {
    let err = SyntheticGenerator::new(GenerationSettings::default())
        .generate(&Dataset::default())
        .unwrap_err();
    assert!(matches!(err, AnalyticsError::NoSourceRecords));
    assert!(err.is_input_error());
}

#[test]
fn test_scenarios_from_real_results() {
    let dataset = survey_dataset();
    let fuzzy = FuzzyScorer::score(&dataset, &Domain::QualityOfLife).value();
    let clusters = ClusteringEngine::new(ClusteringSettings::default())
        .with_seed(Some(8))
        .cluster(&dataset, &Domain::QualityOfLife)
        .value();

    let scenarios =
        ScenarioSynthesizer::synthesize(&Domain::QualityOfLife, Some(&fuzzy), Some(&clusters))
            .value();

    assert!(!scenarios.is_empty() && scenarios.len() <= 5);
    assert!(scenarios.iter().any(|s| s.category == "stratified_approach"));
    assert!(scenarios.iter().all(|s| s.metadata.data_type == "quality_of_life"));
    assert!(
        scenarios
            .windows(2)
            .all(|w| w[0].priority.weight() >= w[1].priority.weight())
    );
}

// ============================================================================
// Engine Tests
// ============================================================================

#[test]
fn test_engine_full_run_healthcare() {
    let config = AnalyticsConfig::builder()
        .domain("healthcare")
        .synthetic_count(40)
        .cluster_count(3)
        .seed(42)
        .build()
        .unwrap();

    let dataset = survey_dataset();
    let report = run_engine(config, &dataset);

    assert_eq!(report.domain, Domain::Healthcare);
    assert_eq!(report.profile.row_count, 60);
    assert_eq!(report.profile.column_count, 5);
    assert_eq!(report.quality.missing_values, 7);
    assert_eq!(report.synthetic.as_ref().map(Vec::len), Some(40));
    assert_eq!(report.fuzzy.total(), 100);
    assert_eq!(report.fuzzy.record_count, 60);

    let clusters = report.clusters.as_ref().unwrap();
    assert!(!clusters.is_empty() && clusters.len() <= 3);
    assert_eq!(clusters.iter().map(|c| c.size).sum::<usize>(), 60);
    assert!(clusters.iter().all(|c| c.label.contains("Patients")));

    assert!(!report.scenarios.is_empty() && report.scenarios.len() <= 5);
    assert!(report.fallbacks.is_empty());
}

#[test]
fn test_engine_is_reproducible_with_seed() {
    let config = || {
        AnalyticsConfig::builder()
            .domain("educational")
            .synthetic_count(10)
            .cluster_count(2)
            .seed(7)
            .build()
            .unwrap()
    };
    let dataset = survey_dataset();

    let first = run_engine(config(), &dataset);
    let second = run_engine(config(), &dataset);

    assert_eq!(first.synthetic, second.synthetic);
    assert_eq!(first.clusters, second.clusters);
    assert_eq!(first.fuzzy, second.fuzzy);
}

#[test]
fn test_engine_without_clustering() {
    let config = AnalyticsConfig::builder()
        .run_clustering(false)
        .seed(1)
        .build()
        .unwrap();
    let report = run_engine(config, &survey_dataset());

    assert!(report.clusters.is_none());
    assert!(report.synthetic.is_some());
    assert!(
        report
            .scenarios
            .iter()
            .all(|s| s.category != "stratified_approach" && s.category != "targeted_intervention")
    );
}

#[test]
fn test_engine_dbscan_partitions_at_most_once() {
    let config = AnalyticsConfig::builder()
        .clustering_method(ClusteringMethod::Dbscan)
        .run_synthetic(false)
        .build()
        .unwrap();
    let report = run_engine(config, &two_blobs());

    let clusters = report.clusters.unwrap();
    let mut members: Vec<usize> = clusters
        .iter()
        .flat_map(|c| c.member_indices.iter().copied())
        .collect();
    let total = members.len();
    members.sort_unstable();
    members.dedup();
    assert_eq!(members.len(), total);
    assert!(total <= 100);
}

#[test]
fn test_engine_rejects_empty_dataset() {
    let engine = AnalyticsEngine::builder().build().unwrap();
    let err = engine.run(&Dataset::default()).unwrap_err();
    assert!(matches!(err, AnalyticsError::EmptyDataset));
    assert_eq!(err.error_code(), "EMPTY_DATASET");
}

#[test]
fn test_engine_cancellation() {
    let token = CancellationToken::new();
    token.cancel();

    let stages = Arc::new(Mutex::new(Vec::new()));
    let sink = stages.clone();

    let result = AnalyticsEngine::builder()
        .cancellation_token(token.clone())
        .on_progress(move |update: ProgressUpdate| sink.lock().unwrap().push(update.stage))
        .build()
        .unwrap()
        .run(&two_blobs());

    assert!(matches!(result, Err(AnalyticsError::Cancelled)));
    assert_eq!(stages.lock().unwrap().last(), Some(&AnalysisStage::Cancelled));

    // A fresh token lets the same engine setup run again
    let report = AnalyticsEngine::builder()
        .cancellation_token(CancellationToken::new())
        .build()
        .unwrap()
        .run(&two_blobs());
    assert!(report.is_ok());
}

#[test]
fn test_engine_progress_reaches_completion() {
    let updates = Arc::new(AtomicUsize::new(0));
    let last = Arc::new(Mutex::new(None));
    let (counter, last_sink) = (updates.clone(), last.clone());

    AnalyticsEngine::builder()
        .config(AnalyticsConfig::builder().seed(2).build().unwrap())
        .on_progress(move |update| {
            counter.fetch_add(1, Ordering::SeqCst);
            *last_sink.lock().unwrap() = Some(update);
        })
        .build()
        .unwrap()
        .run(&survey_dataset())
        .unwrap();

    assert!(updates.load(Ordering::SeqCst) > 2);
    let last = last.lock().unwrap().clone().unwrap();
    assert_eq!(last.stage, AnalysisStage::Complete);
    assert_eq!(last.progress, 1.0);
}

#[test]
fn test_report_serializes_to_json() {
    let config = AnalyticsConfig::builder()
        .synthetic_count(5)
        .cluster_count(2)
        .seed(4)
        .build()
        .unwrap();
    let report = run_engine(config, &age_income_dataset());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["domain"], "demographic");
    assert_eq!(json["quality"]["missing_values"], 1);
    assert!(json["scenarios"].as_array().is_some_and(|s| !s.is_empty()));
    assert!(json["fallbacks"].as_array().is_some_and(|f| f.is_empty()));
}
