//! Quantizer builder -- the primary entry point for the crate.
//!
//! [`Quantizer`] wraps clustering and remapping behind a fluent builder.

use super::error::QuantizeError;
use crate::cluster::{cluster, ClusterOptions};
use crate::output::IndexImage;
use crate::palette::MAX_PALETTE_SIZE;
use crate::pixels::PixelBuffer;
use crate::remap::remap;

/// Result of quantizing one image.
#[derive(Debug, Clone)]
pub struct Quantized {
    /// Palette-indexed image covering every pixel
    pub image: IndexImage,
    /// Mini-batch steps performed (0 when the palette is exact)
    pub iterations: usize,
    /// Whether clustering stopped before the iteration cap
    pub converged: bool,
}

/// Reduce an RGB image to at most `k` colors.
///
/// # Design
///
/// - `k` is clamped into `1..=256` at construction
/// - Configuration methods consume and return `self`
/// - [`quantize()`](Self::quantize) takes `&self`, so one quantizer can be
///   reused across a whole batch of images
///
/// # Example
///
/// ```
/// use kmeans_palette::{PixelBuffer, Quantizer, Rgb8};
///
/// let pixels: Vec<Rgb8> = (0..64u8).map(|v| Rgb8::new(v * 4, 0, 255 - v * 4)).collect();
/// let buffer = PixelBuffer::from_pixels(8, 8, &pixels).unwrap();
///
/// let quantized = Quantizer::new(4).seed(0).quantize(&buffer).unwrap();
/// assert_eq!(quantized.image.palette().len(), 4);
/// assert_eq!(quantized.image.indices().len(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct Quantizer {
    k: usize,
    options: ClusterOptions,
}

impl Quantizer {
    /// Create a quantizer targeting at most `k` colors.
    pub fn new(k: usize) -> Self {
        Self {
            k: k.clamp(1, MAX_PALETTE_SIZE),
            options: ClusterOptions::default(),
        }
    }

    /// Requested palette size after clamping.
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn options(&self) -> &ClusterOptions {
        &self.options
    }

    /// Replace all clustering options at once.
    #[inline]
    pub fn with_options(mut self, options: ClusterOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.options = self.options.seed(seed);
        self
    }

    #[inline]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.options = self.options.batch_size(batch_size);
        self
    }

    #[inline]
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.options = self.options.max_iterations(max_iterations);
        self
    }

    #[inline]
    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.options = self.options.tolerance(tolerance);
        self
    }

    #[inline]
    pub fn max_no_improvement(mut self, patience: Option<usize>) -> Self {
        self.options = self.options.max_no_improvement(patience);
        self
    }

    /// Cluster the buffer's colors and remap every pixel.
    ///
    /// The effective palette size is `min(k, pixel count, distinct colors)`.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::Cluster`] if the buffer has no pixels.
    pub fn quantize(&self, buffer: &PixelBuffer) -> Result<Quantized, QuantizeError> {
        let samples = buffer.to_samples();
        let k = self.k.min(samples.len().max(1));
        let clustering = cluster(&samples, k, &self.options)?;

        let iterations = clustering.iterations();
        let converged = clustering.converged();
        let (palette, labels) = clustering.into_parts();
        let image = remap(buffer, &palette, Some(&labels));

        Ok(Quantized {
            image,
            iterations,
            converged,
        })
    }
}
