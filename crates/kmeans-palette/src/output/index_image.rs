//! IndexImage struct: palette indices with dimensions and palette.

use crate::palette::Palette;

/// A palette-indexed image.
///
/// Stores one `u8` palette index per pixel in row-major order, along with
/// the image dimensions and the palette the indices refer to.
///
/// # Example
///
/// ```
/// use kmeans_palette::{IndexImage, Palette, Rgb8};
///
/// let palette = Palette::new(&[Rgb8::new(0, 0, 0), Rgb8::new(255, 255, 255)]).unwrap();
/// let image = IndexImage::new(vec![0, 1, 1, 0], 2, 2, palette);
///
/// assert_eq!(image.to_rgb(), vec![0, 0, 0, 255, 255, 255, 255, 255, 255, 0, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexImage {
    indices: Vec<u8>,
    width: u32,
    height: u32,
    palette: Palette,
}

impl IndexImage {
    /// Create a new `IndexImage`.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height` and that every
    /// index is within the palette.
    pub fn new(indices: Vec<u8>, width: u32, height: u32, palette: Palette) -> Self {
        debug_assert_eq!(
            indices.len(),
            width as usize * height as usize,
            "indices length ({}) must match width * height ({}x{})",
            indices.len(),
            width,
            height,
        );
        debug_assert!(indices.iter().all(|&i| (i as usize) < palette.len()));
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Number of distinct palette entries actually referenced.
    pub fn used_palette_entries(&self) -> usize {
        let mut seen = [false; 256];
        for &i in &self.indices {
            seen[i as usize] = true;
        }
        seen.iter().filter(|&&s| s).count()
    }

    /// Expand to RGB bytes by looking up each index in the palette.
    ///
    /// The returned buffer has length `width * height * 3`.
    pub fn to_rgb(&self) -> Vec<u8> {
        let colors = self.palette.colors();
        let mut rgb = Vec::with_capacity(self.indices.len() * 3);
        for &i in &self.indices {
            rgb.extend_from_slice(&colors[i as usize].to_bytes());
        }
        rgb
    }

    pub fn into_parts(self) -> (Vec<u8>, Palette) {
        (self.indices, self.palette)
    }
}
