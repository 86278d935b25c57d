//! Palette remapping
//!
//! Assigns every pixel of a [`PixelBuffer`] the index of its nearest palette
//! entry. Labels already known from clustering are reused; the rest are
//! looked up, with a per-color cache since real images repeat colors
//! heavily.

use std::collections::HashMap;

use crate::output::IndexImage;
use crate::palette::Palette;
use crate::pixels::PixelBuffer;

/// Map every pixel of `buffer` to its nearest entry in `palette`.
///
/// `labels`, when given, must have one entry per pixel; `Some(i)` entries
/// are trusted as the nearest index for that pixel. A label slice of the
/// wrong length, or an out-of-range label, is ignored and the pixel is
/// looked up instead. Ties resolve to the lowest palette index.
///
/// # Example
///
/// ```
/// use kmeans_palette::{remap, Palette, PixelBuffer, Rgb8};
///
/// let buffer = PixelBuffer::from_pixels(2, 1, &[Rgb8::new(9, 9, 9), Rgb8::new(240, 250, 255)]).unwrap();
/// let palette = Palette::new(&[Rgb8::new(0, 0, 0), Rgb8::new(255, 255, 255)]).unwrap();
///
/// let image = remap(&buffer, &palette, None);
/// assert_eq!(image.indices(), &[0, 1]);
/// ```
pub fn remap(buffer: &PixelBuffer, palette: &Palette, labels: Option<&[Option<u8>]>) -> IndexImage {
    let labels = labels.filter(|l| l.len() == buffer.pixel_count());
    let palette_len = palette.len();
    let mut cache: HashMap<[u8; 3], u8> = HashMap::new();

    let indices: Vec<u8> = buffer
        .samples()
        .enumerate()
        .map(|(i, color)| {
            if let Some(Some(label)) = labels.map(|l| l[i]) {
                if (label as usize) < palette_len {
                    return label;
                }
            }
            *cache
                .entry(color.to_bytes())
                .or_insert_with(|| palette.find_nearest(color))
        })
        .collect();

    IndexImage::new(indices, buffer.width(), buffer.height(), palette.clone())
}
