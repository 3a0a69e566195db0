//! Agglomerative clustering with centroid linkage.
//!
//! Each merge scans every pair of clusters, so a full run is cubic in the
//! number of records. Intended for datasets of at most a few hundred rows.

use super::Group;
use crate::error::Result;
use crate::pipeline::CancellationToken;
use crate::utils::squared_distance;
use tracing::debug;

/// Merge the closest pair of clusters until `k` remain.
///
/// Ties resolve to the lowest `(i, j)` pair in current cluster order.
pub(crate) fn hierarchical(
    vectors: &[Vec<f64>],
    k: usize,
    token: &CancellationToken,
) -> Result<Vec<Group>> {
    if vectors.is_empty() {
        return Ok(Vec::new());
    }
    let k = k.clamp(1, vectors.len());

    let mut groups: Vec<Group> = vectors
        .iter()
        .enumerate()
        .map(|(i, v)| Group {
            members: vec![i],
            center: v.clone(),
        })
        .collect();

    while groups.len() > k {
        token.check()?;

        let mut best = (0, 1);
        let mut best_distance = f64::INFINITY;
        for i in 0..groups.len() {
            for j in (i + 1)..groups.len() {
                let d = squared_distance(&groups[i].center, &groups[j].center);
                if d < best_distance {
                    best = (i, j);
                    best_distance = d;
                }
            }
        }

        let (i, j) = best;
        let absorbed = groups.remove(j);
        merge_into(&mut groups[i], absorbed);
    }

    debug!("Hierarchical clustering reduced {} points to {} clusters", vectors.len(), k);
    Ok(groups)
}

/// Fold `other` into `target`, updating the centroid as a size-weighted mean.
fn merge_into(target: &mut Group, other: Group) {
    let (n_target, n_other) = (target.members.len() as f64, other.members.len() as f64);
    let total = n_target + n_other;
    for (c, o) in target.center.iter_mut().zip(&other.center) {
        *c = (*c * n_target + o * n_other) / total;
    }
    target.members.extend(other.members);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;

    #[test]
    fn test_merges_nearest_points_first() {
        let vectors = vec![vec![0.0], vec![0.1], vec![1.0], vec![1.05], vec![5.0]];
        let groups = hierarchical(&vectors, 3, &CancellationToken::new()).unwrap();

        let mut members: Vec<Vec<usize>> = groups.iter().map(|g| g.members.clone()).collect();
        members.iter_mut().for_each(|m| m.sort());
        assert_eq!(members, vec![vec![0, 1], vec![2, 3], vec![4]]);
        assert!((groups[0].center[0] - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_partition_covers_every_point_once() {
        let vectors: Vec<Vec<f64>> = (0..12).map(|i| vec![(i % 4) as f64, (i / 4) as f64]).collect();
        let groups = hierarchical(&vectors, 4, &CancellationToken::new()).unwrap();
        assert_eq!(groups.len(), 4);

        let mut all: Vec<usize> = groups.iter().flat_map(|g| g.members.clone()).collect();
        all.sort();
        assert_eq!(all, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_ties_merge_lowest_pair() {
        // equal spacing: the first pair is merged first
        let vectors = vec![vec![0.0], vec![1.0], vec![2.0]];
        let groups = hierarchical(&vectors, 2, &CancellationToken::new()).unwrap();
        assert_eq!(groups[0].members, vec![0, 1]);
        assert_eq!(groups[1].members, vec![2]);
    }

    #[test]
    fn test_k_larger_than_points() {
        let vectors = vec![vec![0.0], vec![1.0]];
        let groups = hierarchical(&vectors, 10, &CancellationToken::new()).unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let vectors = vec![vec![0.0], vec![1.0], vec![2.0]];
        assert!(matches!(
            hierarchical(&vectors, 1, &token),
            Err(AnalyticsError::Cancelled)
        ));
    }
}
