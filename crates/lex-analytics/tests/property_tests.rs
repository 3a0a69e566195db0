//! Property tests for the analytics invariants callers rely on:
//! - K-Means and hierarchical clusters partition the input exactly once
//! - non-empty fuzzy distributions sum to 100
//! - completeness stays within [0, 100]
//! - synthetic generation returns exactly the requested count
//! - scenarios are capped at five and ordered by priority

use lex_analytics::{
    AnalysisExt, Cluster, ClusteringEngine, ClusteringMethod, ClusteringSettings,
    DataQualityAnalyzer, Dataset, Domain, FuzzyResult, FuzzyScorer, GenerationMethod,
    GenerationSettings, Record, Scalar, ScenarioSynthesizer, SyntheticGenerator,
    scenario::MAX_SCENARIOS,
};
use proptest::prelude::*;

const COLUMNS: [&str; 3] = ["age", "city", "score"];

fn scalar_strategy() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        Just(Scalar::Null),
        (-1000i64..1000).prop_map(Scalar::Int),
        (-500.0f64..500.0).prop_map(Scalar::Float),
        prop::sample::select(vec!["Yerevan", "Gyumri", "yes", "12", "", "a@b.am"])
            .prop_map(Scalar::from),
        any::<bool>().prop_map(Scalar::Bool),
    ]
}

fn dataset_strategy(max_records: usize) -> impl Strategy<Value = Dataset> {
    prop::collection::vec(prop::collection::vec(scalar_strategy(), COLUMNS.len()), 1..max_records)
        .prop_map(|rows| {
            let records = rows
                .into_iter()
                .map(|values| {
                    let mut record = Record::with_capacity(COLUMNS.len());
                    for (column, value) in COLUMNS.iter().zip(values) {
                        record.insert(*column, value);
                    }
                    record
                })
                .collect();
            Dataset::from_records(records)
        })
}

fn domain_strategy() -> impl Strategy<Value = Domain> {
    prop::sample::select(vec![
        Domain::Demographic,
        Domain::Healthcare,
        Domain::QualityOfLife,
        Domain::Educational,
        Domain::Other("retail".to_string()),
    ])
}

/// A distribution summing to 100.
fn fuzzy_strategy() -> impl Strategy<Value = FuzzyResult> {
    (0u32..=100)
        .prop_flat_map(|low| (Just(low), 0u32..=(100 - low)))
        .prop_map(|(low, medium)| FuzzyResult {
            low,
            medium,
            high: 100 - low - medium,
            ..FuzzyResult::empty()
        })
}

fn clusters_strategy() -> impl Strategy<Value = Vec<Cluster>> {
    prop::collection::vec(0usize..40, 0..6).prop_map(|sizes| {
        sizes
            .into_iter()
            .enumerate()
            .map(|(id, size)| Cluster {
                id,
                label: format!("Group {}", id),
                size,
                center: Vec::new(),
                points: vec![Record::new(); size],
                member_indices: (0..size).collect(),
                avg_value: 0.0,
                quality: 0.0,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn clusters_partition_the_dataset(
        dataset in dataset_strategy(30),
        k in 1usize..6,
        hierarchical in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let method = if hierarchical {
            ClusteringMethod::Hierarchical
        } else {
            ClusteringMethod::KMeans
        };
        let settings = ClusteringSettings { cluster_count: k, method, max_iterations: 50 };

        let clusters = ClusteringEngine::new(settings)
            .with_seed(Some(seed))
            .cluster(&dataset, &Domain::Demographic)
            .value();

        prop_assert!(clusters.len() <= k);
        prop_assert_eq!(clusters.iter().map(|c| c.size).sum::<usize>(), dataset.len());

        let mut members: Vec<usize> = clusters
            .iter()
            .flat_map(|c| c.member_indices.iter().copied())
            .collect();
        members.sort_unstable();
        prop_assert_eq!(members, (0..dataset.len()).collect::<Vec<_>>());

        for cluster in &clusters {
            prop_assert_eq!(cluster.size, cluster.points.len());
            for (point, &index) in cluster.points.iter().zip(&cluster.member_indices) {
                prop_assert_eq!(point, &dataset.records()[index]);
            }
        }
    }

    #[test]
    fn fuzzy_buckets_sum_to_100(dataset in dataset_strategy(50), domain in domain_strategy()) {
        let fuzzy = FuzzyScorer::score(&dataset, &domain).value();
        prop_assert_eq!(fuzzy.total(), 100);
        prop_assert_eq!(fuzzy.record_count, dataset.len());
    }

    #[test]
    fn completeness_is_bounded(dataset in dataset_strategy(50)) {
        let quality = DataQualityAnalyzer::analyze(&dataset);
        prop_assert!((0.0..=100.0).contains(&quality.completeness));
        prop_assert!((0.0..=100.0).contains(&quality.accuracy));
        prop_assert!(quality.missing_values <= quality.total_cells);
    }

    #[test]
    fn synthetic_count_is_exact(
        dataset in dataset_strategy(20),
        count in 1usize..60,
        method in prop::sample::select(vec![
            GenerationMethod::Statistical,
            GenerationMethod::Pattern,
            GenerationMethod::Interpolation,
            GenerationMethod::MachineLearning,
        ]),
        include_noise in any::<bool>(),
        preserve_distribution in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let settings = GenerationSettings { count, method, include_noise, preserve_distribution };
        let records = SyntheticGenerator::new(settings)
            .with_seed(Some(seed))
            .generate(&dataset)
            .unwrap();
        prop_assert_eq!(records.len(), count);
    }

    #[test]
    fn scenarios_are_capped_and_ordered(
        domain in domain_strategy(),
        fuzzy in prop::option::of(fuzzy_strategy()),
        clusters in prop::option::of(clusters_strategy()),
    ) {
        let scenarios = ScenarioSynthesizer::synthesize(
            &domain,
            fuzzy.as_ref(),
            clusters.as_deref(),
        )
        .value();

        prop_assert!(!scenarios.is_empty());
        prop_assert!(scenarios.len() <= MAX_SCENARIOS);
        prop_assert!(
            scenarios
                .windows(2)
                .all(|w| w[0].priority.weight() >= w[1].priority.weight())
        );
    }
}

#[test]
fn completeness_of_empty_dataset_is_zero() {
    let quality = DataQualityAnalyzer::analyze(&Dataset::default());
    assert!((0.0..=100.0).contains(&quality.completeness));
}
