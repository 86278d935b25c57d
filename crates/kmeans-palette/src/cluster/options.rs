//! Clustering options and configuration.

/// Default seed for the clustering random number generator.
pub const DEFAULT_SEED: u64 = 0;
/// Default number of samples drawn per mini-batch step.
pub const DEFAULT_BATCH_SIZE: usize = 32_768;
/// Default cap on mini-batch steps.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
/// Default convergence threshold on total squared centroid movement.
pub const DEFAULT_TOLERANCE: f32 = 1e-3;
/// Default number of steps without inertia improvement before stopping.
pub const DEFAULT_MAX_NO_IMPROVEMENT: usize = 10;

/// Configuration for [`cluster()`](super::cluster).
///
/// # Defaults
///
/// - Seed: `0`
/// - Batch size: `32768` samples
/// - Iteration cap: `100` mini-batch steps
/// - Tolerance: `1e-3` (sum over centroids of squared movement, in 8-bit units)
/// - No-improvement patience: `10` steps
/// - Initialization subset: `3 * batch_size` samples
///
/// # Example
///
/// ```
/// use kmeans_palette::ClusterOptions;
///
/// let options = ClusterOptions::new()
///     .seed(42)
///     .batch_size(1024)
///     .max_iterations(50);
/// assert_eq!(options.seed, 42);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOptions {
    /// Seed for centroid initialization and batch sampling.
    pub seed: u64,

    /// Samples drawn (with replacement) per refinement step. When the input
    /// has no more samples than this, every step uses all of them.
    pub batch_size: usize,

    /// Upper bound on refinement steps.
    pub max_iterations: usize,

    /// Stop once the summed squared centroid movement of a step falls to or
    /// below this value.
    pub tolerance: f32,

    /// Stop after this many consecutive steps without improving the smoothed
    /// batch inertia. `None` disables the check.
    pub max_no_improvement: Option<usize>,

    /// Number of samples used for k-means++ seeding. `None` means
    /// `3 * batch_size`.
    pub init_size: Option<usize>,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            batch_size: DEFAULT_BATCH_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            max_no_improvement: Some(DEFAULT_MAX_NO_IMPROVEMENT),
            init_size: None,
        }
    }
}

impl ClusterOptions {
    /// Create options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the mini-batch size. Values below 1 are raised to 1.
    #[inline]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the iteration cap. Values below 1 are raised to 1.
    #[inline]
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Set the centroid-movement tolerance. Negative values are treated as 0.
    #[inline]
    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    #[inline]
    pub fn max_no_improvement(mut self, patience: Option<usize>) -> Self {
        self.max_no_improvement = patience;
        self
    }

    /// Set the seeding subset size. Values below 1 are raised to 1.
    #[inline]
    pub fn init_size(mut self, init_size: usize) -> Self {
        self.init_size = Some(init_size.max(1));
        self
    }

    pub(crate) fn effective_init_size(&self) -> usize {
        self.init_size
            .unwrap_or_else(|| self.batch_size.saturating_mul(3))
    }
}
