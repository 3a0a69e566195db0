//! Record clustering.
//!
//! Records are first encoded as feature vectors (numeric columns min-max
//! normalized, other columns hashed), then grouped by one of:
//!
//! - **K-Means** with K-Means++ seeding
//! - **Hierarchical** agglomeration with centroid linkage
//! - **DBSCAN** with `eps = 0.3` and `min_points = 3`
//!
//! K-Means and hierarchical results partition the dataset. DBSCAN may leave
//! noise records out of every cluster.
//!
//! Clustering never fails toward the caller. Errors (other than
//! cancellation, which the engine re-raises) are replaced by an equal-chunk
//! partition carried in a [`Diagnostic`](crate::error::Diagnostic).

mod dbscan;
mod hierarchical;
mod kmeans;
mod labels;
mod vectorize;

pub use dbscan::{DBSCAN_EPS, DBSCAN_MIN_POINTS};

use crate::config::{ClusteringMethod, ClusteringSettings};
use crate::error::{Analysis, AnalyticsError, Result, recover};
use crate::pipeline::CancellationToken;
use crate::record::Dataset;
use crate::types::{Cluster, Domain};
use crate::utils::{euclidean_distance, mean, norm};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use labels::cluster_label;
use vectorize::vectorize;

/// Member indices of one cluster plus its center, before decoration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Group {
    pub members: Vec<usize>,
    pub center: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct ClusteringEngine {
    settings: ClusteringSettings,
    seed: Option<u64>,
    cancellation_token: CancellationToken,
}

impl ClusteringEngine {
    pub fn new(settings: ClusteringSettings) -> Self {
        Self {
            settings,
            seed: None,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Fix the random seed used by K-Means++ seeding.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Share a cancellation token with the iteration loops.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    pub fn settings(&self) -> &ClusteringSettings {
        &self.settings
    }

    /// Cluster `dataset`, labelling groups for `domain`.
    ///
    /// Empty clusters are dropped and the rest renumbered from 0. An empty
    /// dataset yields no clusters.
    pub fn cluster(&self, dataset: &Dataset, domain: &Domain) -> Analysis<Vec<Cluster>> {
        if dataset.is_empty() {
            return Ok(Vec::new());
        }
        recover("Clustering", self.try_cluster(dataset, domain), |_| {
            fallback_clusters(dataset, domain, self.settings.cluster_count)
        })
    }

    fn try_cluster(&self, dataset: &Dataset, domain: &Domain) -> Result<Vec<Cluster>> {
        let ClusteringSettings {
            cluster_count,
            method,
            max_iterations,
        } = self.settings;
        if cluster_count == 0 && method != ClusteringMethod::Dbscan {
            return Err(AnalyticsError::InvalidConfig(
                "cluster_count must be at least 1".to_string(),
            ));
        }

        let matrix = vectorize(dataset);
        matrix.validate()?;
        debug!(
            "Vectorized {} records into {} dimensions",
            matrix.len(),
            matrix.dimensions.len()
        );

        let token = &self.cancellation_token;
        let groups = match method {
            ClusteringMethod::KMeans => {
                let mut rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                kmeans::kmeans(&matrix.vectors, cluster_count, max_iterations, &mut rng, token)?
            }
            ClusteringMethod::Hierarchical => {
                hierarchical::hierarchical(&matrix.vectors, cluster_count, token)?
            }
            ClusteringMethod::Dbscan => {
                dbscan::dbscan(&matrix.vectors, DBSCAN_EPS, DBSCAN_MIN_POINTS, token)?
            }
        };

        let clusters = decorate(dataset, &matrix.vectors, groups, domain);
        info!(
            "Clustering ({}) produced {} clusters over {} records",
            method,
            clusters.len(),
            dataset.len()
        );
        Ok(clusters)
    }
}

/// Attach labels, member records and summary scores; drop empty groups.
fn decorate(
    dataset: &Dataset,
    vectors: &[Vec<f64>],
    groups: Vec<Group>,
    domain: &Domain,
) -> Vec<Cluster> {
    groups
        .into_iter()
        .filter(|g| !g.members.is_empty())
        .enumerate()
        .map(|(id, group)| {
            let norms: Vec<f64> = group.members.iter().map(|&m| norm(&vectors[m])).collect();
            let distances: Vec<f64> = group
                .members
                .iter()
                .map(|&m| euclidean_distance(&vectors[m], &group.center))
                .collect();

            Cluster {
                id,
                label: cluster_label(domain, id),
                size: group.members.len(),
                points: group
                    .members
                    .iter()
                    .map(|&m| dataset.records()[m].clone())
                    .collect(),
                avg_value: (mean(&norms).unwrap_or(0.0) * 100.0).round(),
                quality: cohesion(&distances),
                center: group.center,
                member_indices: group.members,
            }
        })
        .collect()
}

/// `100 / (1 + mean distance to center)`, rounded; 100 for a perfect cluster.
fn cohesion(distances: &[f64]) -> f64 {
    let spread = mean(distances).unwrap_or(0.0);
    (100.0 / (1.0 + spread)).round()
}

/// Equal-sized chunks in record order with placeholder scores.
fn fallback_clusters(dataset: &Dataset, domain: &Domain, cluster_count: usize) -> Vec<Cluster> {
    let n = dataset.len();
    if n == 0 {
        return Vec::new();
    }
    let k = cluster_count.clamp(1, n);
    let chunk = n.div_ceil(k);

    dataset
        .records()
        .chunks(chunk)
        .enumerate()
        .map(|(id, records)| {
            let start = id * chunk;
            Cluster {
                id,
                label: cluster_label(domain, id),
                size: records.len(),
                center: Vec::new(),
                points: records.to_vec(),
                member_indices: (start..start + records.len()).collect(),
                avg_value: 0.0,
                quality: 0.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisExt;
    use crate::record;

    fn settings(method: ClusteringMethod, k: usize) -> ClusteringSettings {
        ClusteringSettings {
            cluster_count: k,
            method,
            max_iterations: 100,
        }
    }

    fn blobs() -> Dataset {
        let mut records = Vec::new();
        for i in 0..10 {
            records.push(record! { "x" => 1.0 + i as f64 * 0.1, "y" => 1.0 });
            records.push(record! { "x" => 50.0 + i as f64 * 0.1, "y" => 9.0 });
        }
        Dataset::from_records(records)
    }

    #[test]
    fn test_kmeans_labels_and_partition() {
        let engine = ClusteringEngine::new(settings(ClusteringMethod::KMeans, 2)).with_seed(Some(7));
        let clusters = engine.cluster(&blobs(), &Domain::Healthcare).value();

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters.iter().map(|c| c.size).sum::<usize>(), 20);
        assert_eq!(clusters[0].label, "Low-Risk Patients");
        for cluster in &clusters {
            assert_eq!(cluster.size, cluster.points.len());
            assert_eq!(cluster.size, cluster.member_indices.len());
            assert!(cluster.quality > 0.0 && cluster.quality <= 100.0);
        }
    }

    #[test]
    fn test_hierarchical_and_dbscan() {
        let dataset = blobs();
        let clusters = ClusteringEngine::new(settings(ClusteringMethod::Hierarchical, 2))
            .cluster(&dataset, &Domain::Demographic)
            .value();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].size, 10);

        let clusters = ClusteringEngine::new(settings(ClusteringMethod::Dbscan, 2))
            .cluster(&dataset, &Domain::Other("retail".to_string()))
            .value();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[1].label, "Group B");
    }

    #[test]
    fn test_identical_records_score_full_quality() {
        let dataset = Dataset::from_records((0..4).map(|_| record! { "v" => 3 }).collect());
        let clusters = ClusteringEngine::new(settings(ClusteringMethod::KMeans, 1))
            .with_seed(Some(1))
            .cluster(&dataset, &Domain::Demographic)
            .value();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].quality, 100.0);
        assert_eq!(clusters[0].avg_value, 0.0);
    }

    #[test]
    fn test_invalid_cluster_count_falls_back_to_chunks() {
        let outcome = ClusteringEngine::new(settings(ClusteringMethod::KMeans, 0))
            .cluster(&blobs(), &Domain::Demographic);
        assert!(outcome.used_fallback());
        let clusters = outcome.value();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].size, 20);
        assert!(clusters[0].center.is_empty());
    }

    #[test]
    fn test_fallback_chunks_are_equal_sized() {
        let dataset = blobs();
        let clusters = fallback_clusters(&dataset, &Domain::Educational, 3);
        let sizes: Vec<usize> = clusters.iter().map(|c| c.size).collect();
        assert_eq!(sizes, vec![7, 7, 6]);
        assert_eq!(clusters[2].member_indices, (14..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_cancellation_is_reported_as_cause() {
        let token = CancellationToken::new();
        token.cancel();
        let outcome = ClusteringEngine::new(settings(ClusteringMethod::KMeans, 2))
            .with_cancellation(token)
            .cluster(&blobs(), &Domain::Demographic);
        assert!(outcome.cause().is_some_and(|c| c.is_cancelled()));
    }

    #[test]
    fn test_empty_dataset() {
        let outcome = ClusteringEngine::new(ClusteringSettings::default())
            .cluster(&Dataset::default(), &Domain::Demographic);
        assert!(!outcome.used_fallback());
        assert!(outcome.value().is_empty());
    }
}
