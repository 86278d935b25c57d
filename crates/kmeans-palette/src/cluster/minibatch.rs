//! Mini-batch k-means refinement.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::ClusterError;
use super::options::ClusterOptions;
use super::seeding::{distance_squared, kmeans_plus_plus};
use crate::color::Rgb8;
use crate::palette::{Palette, MAX_PALETTE_SIZE};

/// Result of clustering a sample set.
///
/// `labels` has one entry per input sample. An entry is `Some(index)` when
/// the clusterer already knows the sample's nearest palette entry, and
/// `None` when the sample was never part of the final mini-batch. Every
/// `Some` label is the nearest entry of the final (rounded) palette.
#[derive(Debug, Clone)]
pub struct Clustering {
    palette: Palette,
    labels: Vec<Option<u8>>,
    iterations: usize,
    converged: bool,
    exact: bool,
}

impl Clustering {
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn labels(&self) -> &[Option<u8>] {
        &self.labels
    }

    /// Number of samples with a known label.
    pub fn labeled_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_some()).count()
    }

    /// Mini-batch steps performed (0 for an exact palette).
    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether refinement stopped before hitting the iteration cap.
    #[inline]
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Whether the palette is the set of distinct input colors itself.
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.exact
    }

    pub fn into_parts(self) -> (Palette, Vec<Option<u8>>) {
        (self.palette, self.labels)
    }
}

/// Cluster `samples` into at most `k` colors.
///
/// The effective number of clusters is `min(k, distinct colors)`. When the
/// samples contain no more than `k` distinct colors, those colors become the
/// palette unchanged (in first-occurrence order) and every sample is
/// labeled.
///
/// # Errors
///
/// - [`ClusterError::EmptySamples`] if `samples` is empty
/// - [`ClusterError::ZeroClusters`] if `k == 0`
/// - [`ClusterError::TooManyClusters`] if `k > 256`
///
/// # Example
///
/// ```
/// use kmeans_palette::{cluster, ClusterOptions, Rgb8};
///
/// let samples = vec![Rgb8::new(0, 0, 0), Rgb8::new(250, 0, 0), Rgb8::new(255, 0, 0)];
/// let result = cluster(&samples, 2, &ClusterOptions::new().seed(1)).unwrap();
/// assert_eq!(result.palette().len(), 2);
/// ```
pub fn cluster(
    samples: &[Rgb8],
    k: usize,
    options: &ClusterOptions,
) -> Result<Clustering, ClusterError> {
    if samples.is_empty() {
        return Err(ClusterError::EmptySamples);
    }
    if k == 0 {
        return Err(ClusterError::ZeroClusters);
    }
    if k > MAX_PALETTE_SIZE {
        return Err(ClusterError::TooManyClusters { requested: k });
    }

    if let Some(exact) = exact_palette(samples, k) {
        return Ok(exact);
    }
    Ok(refine(samples, k, options))
}

/// Build the palette directly from the distinct colors, if there are at most `k`.
fn exact_palette(samples: &[Rgb8], k: usize) -> Option<Clustering> {
    let mut index: HashMap<Rgb8, u8> = HashMap::with_capacity(k);
    let mut colors: Vec<Rgb8> = Vec::with_capacity(k);
    for &sample in samples {
        if index.contains_key(&sample) {
            continue;
        }
        if colors.len() == k {
            return None;
        }
        index.insert(sample, colors.len() as u8);
        colors.push(sample);
    }

    let labels = samples.iter().map(|s| index.get(s).copied()).collect();
    Some(Clustering {
        palette: Palette::from_centroids(colors),
        labels,
        iterations: 0,
        converged: true,
        exact: true,
    })
}

/// Seed and refine exactly `k` centroids. Requires more than `k` distinct colors.
fn refine(samples: &[Rgb8], k: usize, options: &ClusterOptions) -> Clustering {
    let n = samples.len();
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut centers = initial_centers(samples, k, options, &mut rng);

    let full_batch = n <= options.batch_size;
    let batch_len = if full_batch { n } else { options.batch_size };
    // Smoothing factor of the inertia moving average
    let alpha = (batch_len as f64 * 2.0 / (n as f64 + 1.0)).min(1.0);

    let mut counts = vec![0u64; k];
    let mut sums = vec![[0.0f64; 3]; k];
    let mut members = vec![0u64; k];
    let mut batch: Vec<usize> = Vec::with_capacity(batch_len);

    let mut ewa_inertia: Option<f64> = None;
    let mut ewa_min = f64::INFINITY;
    let mut no_improvement = 0usize;
    let mut iterations = 0usize;
    let mut converged = false;

    for step in 0..options.max_iterations {
        iterations = step + 1;

        batch.clear();
        if full_batch {
            batch.extend(0..n);
        } else {
            batch.extend((0..batch_len).map(|_| rng.gen_range(0..n)));
        }

        sums.fill([0.0; 3]);
        members.fill(0);
        let mut inertia = 0.0f64;
        for &i in &batch {
            let sample = samples[i];
            let (c, dist) = nearest_center(sample, &centers);
            inertia += dist as f64;
            members[c] += 1;
            let [r, g, b] = sample.to_f32();
            sums[c][0] += r as f64;
            sums[c][1] += g as f64;
            sums[c][2] += b as f64;
        }

        // Per-center learning rate decays as 1 / (assignments seen so far)
        let mut shift = 0.0f32;
        for c in 0..k {
            if members[c] == 0 {
                continue;
            }
            counts[c] += members[c];
            let total = counts[c] as f64;
            let m = members[c] as f64;
            let old = centers[c];
            let mut new = old;
            for ch in 0..3 {
                let o = old[ch] as f64;
                new[ch] = (o + (sums[c][ch] - m * o) / total) as f32;
            }
            shift += distance_squared(&old, &new);
            centers[c] = new;
        }

        if shift <= options.tolerance {
            converged = true;
            break;
        }

        if let Some(patience) = options.max_no_improvement {
            let batch_inertia = inertia / batch_len as f64;
            let ewa = match ewa_inertia {
                None => batch_inertia,
                Some(prev) => prev * (1.0 - alpha) + batch_inertia * alpha,
            };
            ewa_inertia = Some(ewa);
            if ewa < ewa_min {
                ewa_min = ewa;
                no_improvement = 0;
            } else {
                no_improvement += 1;
                if no_improvement >= patience {
                    converged = true;
                    break;
                }
            }
        }
    }

    let palette = Palette::from_centroids(
        centers.iter().map(|&c| Rgb8::from_f32_rounded(c)).collect(),
    );

    let mut labels = vec![None; n];
    for &i in &batch {
        labels[i] = Some(palette.find_nearest(samples[i]));
    }

    Clustering {
        palette,
        labels,
        iterations,
        converged,
        exact: false,
    }
}

/// Run k-means++ on a random subset of the samples.
///
/// If the subset holds fewer than `k` distinct colors, distinct colors from
/// the full sample set are appended until it does.
fn initial_centers(
    samples: &[Rgb8],
    k: usize,
    options: &ClusterOptions,
    rng: &mut StdRng,
) -> Vec<[f32; 3]> {
    let n = samples.len();
    let init_size = options.effective_init_size().max(k);

    let subset: Vec<Rgb8> = if n <= init_size {
        samples.to_vec()
    } else {
        rand::seq::index::sample(rng, n, init_size)
            .into_iter()
            .map(|i| samples[i])
            .collect()
    };

    let mut distinct: HashSet<Rgb8> = subset.iter().copied().collect();
    let mut points: Vec<[f32; 3]> = subset.iter().map(|c| c.to_f32()).collect();
    if distinct.len() < k {
        for &sample in samples {
            if distinct.insert(sample) {
                points.push(sample.to_f32());
                if distinct.len() >= k {
                    break;
                }
            }
        }
    }

    kmeans_plus_plus(&points, k, rng)
}

#[inline]
fn nearest_center(sample: Rgb8, centers: &[[f32; 3]]) -> (usize, f32) {
    let mut best = 0usize;
    let mut best_dist = f32::INFINITY;
    for (i, c) in centers.iter().enumerate() {
        let d = sample.distance_squared_f32(c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    (best, best_dist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gradient(n: usize) -> Vec<Rgb8> {
        (0..n)
            .map(|i| {
                let v = (i * 255 / n.max(1)) as u8;
                Rgb8::new(v, 255 - v, (i % 7) as u8 * 30)
            })
            .collect()
    }

    #[test]
    fn test_empty_samples() {
        let err = cluster(&[], 4, &ClusterOptions::default()).unwrap_err();
        assert_eq!(err, ClusterError::EmptySamples);
    }

    #[test]
    fn test_zero_and_oversized_k() {
        let samples = [Rgb8::new(1, 2, 3)];
        assert_eq!(
            cluster(&samples, 0, &ClusterOptions::default()).unwrap_err(),
            ClusterError::ZeroClusters
        );
        assert_eq!(
            cluster(&samples, 257, &ClusterOptions::default()).unwrap_err(),
            ClusterError::TooManyClusters { requested: 257 }
        );
    }

    #[test]
    fn test_exact_palette_first_occurrence_order() {
        let samples = [
            Rgb8::new(9, 9, 9),
            Rgb8::new(1, 1, 1),
            Rgb8::new(9, 9, 9),
            Rgb8::new(5, 5, 5),
        ];
        let result = cluster(&samples, 8, &ClusterOptions::default()).unwrap();
        assert!(result.is_exact());
        assert_eq!(result.iterations(), 0);
        assert_eq!(
            result.palette().colors(),
            &[Rgb8::new(9, 9, 9), Rgb8::new(1, 1, 1), Rgb8::new(5, 5, 5)]
        );
        assert_eq!(result.labels(), &[Some(0), Some(1), Some(0), Some(2)]);
    }

    #[test]
    fn test_k_equal_to_distinct_is_exact() {
        let samples = [Rgb8::new(0, 0, 0), Rgb8::new(255, 255, 255)];
        let result = cluster(&samples, 2, &ClusterOptions::default()).unwrap();
        assert!(result.is_exact());
        assert_eq!(result.palette().len(), 2);
    }

    #[test]
    fn test_refine_returns_k_centroids() {
        let samples = gradient(2000);
        let result = cluster(&samples, 16, &ClusterOptions::new().batch_size(256)).unwrap();
        assert!(!result.is_exact());
        assert_eq!(result.palette().len(), 16);
        assert!(result.iterations() >= 1);
        assert!(result.iterations() <= 100);
    }

    #[test]
    fn test_partial_labels_cover_last_batch() {
        let samples = gradient(5000);
        let options = ClusterOptions::new().batch_size(500).max_iterations(5);
        let result = cluster(&samples, 8, &options).unwrap();
        assert_eq!(result.labels().len(), samples.len());
        let labeled = result.labeled_count();
        assert!(labeled > 0 && labeled <= 500, "labeled {labeled}");
        for (i, label) in result.labels().iter().enumerate() {
            if let Some(idx) = label {
                assert_eq!(*idx, result.palette().find_nearest(samples[i]));
            }
        }
    }

    #[test]
    fn test_full_batch_labels_everything() {
        let samples = gradient(300);
        let result = cluster(&samples, 4, &ClusterOptions::new()).unwrap();
        assert_eq!(result.labeled_count(), 300);
    }

    #[test]
    fn test_separated_groups_recovered() {
        let mut samples = Vec::new();
        for i in 0..200u8 {
            samples.push(Rgb8::new(i % 4, 0, 0));
            samples.push(Rgb8::new(0, 250 + i % 4, 0));
            samples.push(Rgb8::new(0, 0, 250 + i % 4));
        }
        let result = cluster(&samples, 3, &ClusterOptions::new().seed(3)).unwrap();
        let mut colors = result.palette().colors().to_vec();
        colors.sort();
        // One centroid per group, each near the group mean
        assert!(colors[0].b >= 250 && colors[0].r == 0 && colors[0].g == 0);
        assert!(colors[1].g >= 250 && colors[1].r == 0 && colors[1].b == 0);
        assert!(colors[2].r <= 3 && colors[2].g == 0 && colors[2].b == 0);
    }

    #[test]
    fn test_iteration_cap_respected() {
        let samples = gradient(4000);
        let options = ClusterOptions::new()
            .batch_size(64)
            .max_iterations(3)
            .tolerance(0.0)
            .max_no_improvement(None);
        let result = cluster(&samples, 32, &options).unwrap();
        assert_eq!(result.iterations(), 3);
        assert!(!result.converged());
    }
}
