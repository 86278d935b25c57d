//! k-means++ centroid seeding.
//!
//! Greedy variant: every step draws several candidates proportionally to
//! their squared distance from the current centers and keeps the one that
//! lowers the total potential the most.

use rand::Rng;

#[inline]
pub(crate) fn distance_squared(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    let d2 = a[2] - b[2];
    d0 * d0 + d1 * d1 + d2 * d2
}

/// Number of candidates evaluated per seeding step.
fn local_trials(k: usize) -> usize {
    2 + (k as f64).ln().floor() as usize
}

/// Pick `k` initial centers from `points`.
///
/// `points` must be non-empty and `k >= 1`. When `points` holds at least
/// `k` distinct values the returned centers are pairwise distinct.
pub(crate) fn kmeans_plus_plus<R: Rng + ?Sized>(
    points: &[[f32; 3]],
    k: usize,
    rng: &mut R,
) -> Vec<[f32; 3]> {
    let n = points.len();
    let trials = local_trials(k);
    let mut centers = Vec::with_capacity(k);

    let first = points[rng.gen_range(0..n)];
    centers.push(first);

    let mut closest: Vec<f32> = points.iter().map(|p| distance_squared(p, &first)).collect();
    let mut potential: f64 = closest.iter().map(|&d| d as f64).sum();
    let mut candidate_closest = vec![0.0f32; n];
    let mut best_closest = vec![0.0f32; n];

    while centers.len() < k {
        if potential <= 0.0 {
            // Every point already coincides with a center
            centers.push(points[rng.gen_range(0..n)]);
            continue;
        }

        let mut best_idx = 0usize;
        let mut best_potential = f64::INFINITY;
        for _ in 0..trials {
            let idx = sample_weighted(&closest, potential, rng);
            let candidate = points[idx];
            let mut trial_potential = 0.0f64;
            for (i, p) in points.iter().enumerate() {
                let d = distance_squared(p, &candidate).min(closest[i]);
                candidate_closest[i] = d;
                trial_potential += d as f64;
            }
            if trial_potential < best_potential {
                best_potential = trial_potential;
                best_idx = idx;
                std::mem::swap(&mut best_closest, &mut candidate_closest);
            }
        }

        centers.push(points[best_idx]);
        std::mem::swap(&mut closest, &mut best_closest);
        potential = best_potential;
    }

    centers
}

/// Draw an index with probability proportional to `weights[i]`.
fn sample_weighted<R: Rng + ?Sized>(weights: &[f32], total: f64, rng: &mut R) -> usize {
    let target = rng.gen::<f64>() * total;
    let mut cumulative = 0.0f64;
    let mut last_positive = 0usize;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        cumulative += w as f64;
        last_positive = i;
        if cumulative > target {
            return i;
        }
    }
    last_positive
}
