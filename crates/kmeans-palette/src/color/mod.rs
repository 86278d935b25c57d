//! Color sample type
//!
//! Clustering operates on plain 8-bit RGB triples. No spatial information
//! is retained once a [`PixelBuffer`](crate::PixelBuffer) is flattened.

mod rgb;

pub use rgb::Rgb8;
