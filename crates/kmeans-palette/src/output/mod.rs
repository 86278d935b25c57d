//! Output types for the quantization pipeline.
//!
//! [`IndexImage`] is what the palette encoder consumes: one `u8` palette
//! index per pixel plus the owned [`Palette`](crate::palette::Palette).

mod index_image;

pub use index_image::IndexImage;
