//! K-Means with K-Means++ seeding.

use super::Group;
use crate::error::Result;
use crate::pipeline::CancellationToken;
use crate::utils::{centroid, euclidean_distance, squared_distance};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use tracing::debug;

/// Iteration stops once no center moves farther than this.
pub(crate) const CONVERGENCE_TOLERANCE: f64 = 0.001;

/// Pick `k` initial centers: the first uniformly, the rest with
/// probability proportional to squared distance from the nearest center.
fn seed_centers<R: Rng + ?Sized>(vectors: &[Vec<f64>], k: usize, rng: &mut R) -> Vec<Vec<f64>> {
    let mut centers = vec![vectors[rng.gen_range(0..vectors.len())].clone()];

    while centers.len() < k {
        let weights: Vec<f64> = vectors
            .iter()
            .map(|v| {
                centers
                    .iter()
                    .map(|c| squared_distance(v, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        // all-zero weights mean every point already sits on a center
        let next = match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(rng),
            Err(_) => rng.gen_range(0..vectors.len()),
        };
        centers.push(vectors[next].clone());
    }

    centers
}

/// Index of the nearest center; ties go to the lower index.
fn nearest(vector: &[f64], centers: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, center) in centers.iter().enumerate() {
        let d = squared_distance(vector, center);
        if d < best_distance {
            best = i;
            best_distance = d;
        }
    }
    best
}

fn assign(vectors: &[Vec<f64>], centers: &[Vec<f64>]) -> Vec<usize> {
    vectors.iter().map(|v| nearest(v, centers)).collect()
}

fn members_of(assignments: &[usize], k: usize) -> Vec<Vec<usize>> {
    let mut members = vec![Vec::new(); k];
    for (point, &cluster) in assignments.iter().enumerate() {
        members[cluster].push(point);
    }
    members
}

/// Partition `vectors` into at most `k` groups.
///
/// `k` is clamped to the number of points. A cluster that loses all its
/// points keeps its previous center.
pub(crate) fn kmeans<R: Rng + ?Sized>(
    vectors: &[Vec<f64>],
    k: usize,
    max_iterations: usize,
    rng: &mut R,
    token: &CancellationToken,
) -> Result<Vec<Group>> {
    let k = k.min(vectors.len());
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut centers = seed_centers(vectors, k, rng);
    let mut iterations = 0;

    while iterations < max_iterations {
        token.check()?;
        iterations += 1;

        let members = members_of(&assign(vectors, &centers), k);
        let updated: Vec<Vec<f64>> = members
            .iter()
            .zip(&centers)
            .map(|(indices, previous)| {
                centroid(vectors, indices).unwrap_or_else(|| previous.clone())
            })
            .collect();

        let shift = centers
            .iter()
            .zip(&updated)
            .map(|(old, new)| euclidean_distance(old, new))
            .fold(0.0, f64::max);
        centers = updated;

        if shift < CONVERGENCE_TOLERANCE {
            break;
        }
    }

    debug!("K-Means finished after {} iterations (k = {})", iterations, k);

    let members = members_of(&assign(vectors, &centers), k);
    Ok(members
        .into_iter()
        .zip(centers)
        .map(|(members, center)| Group { members, center })
        .collect())
}
