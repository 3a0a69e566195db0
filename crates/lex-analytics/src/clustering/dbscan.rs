//! Density-based clustering (DBSCAN).

use super::Group;
use crate::error::Result;
use crate::pipeline::CancellationToken;
use crate::utils::{centroid, euclidean_distance};
use std::collections::VecDeque;
use tracing::debug;

/// Neighborhood radius in normalized feature space.
pub const DBSCAN_EPS: f64 = 0.3;
/// Neighbors (the point itself included) required for a core point.
pub const DBSCAN_MIN_POINTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Unvisited,
    Noise,
    Cluster(usize),
}

fn region_query(vectors: &[Vec<f64>], point: usize, eps: f64) -> Vec<usize> {
    vectors
        .iter()
        .enumerate()
        .filter(|(_, v)| euclidean_distance(&vectors[point], v) <= eps)
        .map(|(i, _)| i)
        .collect()
}

/// Cluster by density. Noise points belong to no returned group.
pub(crate) fn dbscan(
    vectors: &[Vec<f64>],
    eps: f64,
    min_points: usize,
    token: &CancellationToken,
) -> Result<Vec<Group>> {
    let mut labels = vec![Label::Unvisited; vectors.len()];
    let mut cluster_count = 0;

    for point in 0..vectors.len() {
        if labels[point] != Label::Unvisited {
            continue;
        }
        token.check()?;

        let neighbors = region_query(vectors, point, eps);
        if neighbors.len() < min_points {
            labels[point] = Label::Noise;
            continue;
        }

        let cluster = cluster_count;
        cluster_count += 1;
        labels[point] = Label::Cluster(cluster);

        let mut queue: VecDeque<usize> = neighbors.into_iter().filter(|&n| n != point).collect();
        while let Some(candidate) = queue.pop_front() {
            match labels[candidate] {
                // border point reached from a core point
                Label::Noise => labels[candidate] = Label::Cluster(cluster),
                Label::Cluster(_) => {}
                Label::Unvisited => {
                    labels[candidate] = Label::Cluster(cluster);
                    let expansion = region_query(vectors, candidate, eps);
                    if expansion.len() >= min_points {
                        queue.extend(expansion);
                    }
                }
            }
        }
    }

    let mut members = vec![Vec::new(); cluster_count];
    let mut noise = 0;
    for (point, label) in labels.iter().enumerate() {
        match label {
            Label::Cluster(c) => members[*c].push(point),
            _ => noise += 1,
        }
    }

    debug!("DBSCAN found {} clusters and {} noise points", cluster_count, noise);

    Ok(members
        .into_iter()
        .map(|members| {
            let center = centroid(vectors, &members).unwrap_or_default();
            Group { members, center }
        })
        .collect())
}
