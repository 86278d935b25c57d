//! Palette struct with nearest-color matching.

use super::error::PaletteError;
use crate::color::Rgb8;

/// Largest palette addressable with one index byte per pixel.
pub const MAX_PALETTE_SIZE: usize = 256;

/// An ordered table of 1 to 256 colors.
///
/// Entries are not required to be unique: two centroids may round to the
/// same integer color. Matching always prefers the lowest index, so a
/// duplicate entry is simply never selected.
///
/// # Example
///
/// ```
/// use kmeans_palette::{Palette, Rgb8};
///
/// let palette = Palette::new(&[Rgb8::new(0, 0, 0), Rgb8::new(255, 255, 255)]).unwrap();
/// assert_eq!(palette.find_nearest(Rgb8::new(200, 190, 210)), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb8>,
}

impl Palette {
    /// Create a palette from its colors.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] if `colors` is empty
    /// - [`PaletteError::TooManyColors`] if there are more than 256 colors
    pub fn new(colors: &[Rgb8]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if colors.len() > MAX_PALETTE_SIZE {
            return Err(PaletteError::TooManyColors { len: colors.len() });
        }
        Ok(Self {
            colors: colors.to_vec(),
        })
    }

    /// Wrap colors already known to satisfy the size bounds.
    pub(crate) fn from_centroids(colors: Vec<Rgb8>) -> Self {
        debug_assert!(!colors.is_empty() && colors.len() <= MAX_PALETTE_SIZE);
        Self { colors }
    }

    /// Number of entries (1..=256).
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; kept for API symmetry with `len()`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn colors(&self) -> &[Rgb8] {
        &self.colors
    }

    #[inline]
    pub fn get(&self, index: u8) -> Option<Rgb8> {
        self.colors.get(index as usize).copied()
    }

    /// Index of the entry closest to `color` by Euclidean RGB distance.
    ///
    /// Ties resolve to the lowest index.
    pub fn find_nearest(&self, color: Rgb8) -> u8 {
        let mut best_idx = 0usize;
        let mut best_dist = u32::MAX;
        for (idx, entry) in self.colors.iter().enumerate() {
            let dist = color.distance_squared(*entry);
            if dist < best_dist {
                best_dist = dist;
                best_idx = idx;
                if dist == 0 {
                    break;
                }
            }
        }
        best_idx as u8
    }

    /// Flattened `R, G, B, R, G, B, ...` table, the layout of a PNG PLTE chunk.
    pub fn to_rgb_table(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| c.to_bytes()).collect()
    }
}
