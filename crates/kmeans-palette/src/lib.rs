//! kmeans-palette: seeded palette quantization for RGB images
//!
//! This library reduces an RGB image to a palette of at most 256 colors
//! using mini-batch k-means, and maps every pixel to a palette index so the
//! result can be stored with one byte (or less) per pixel.
//!
//! # Quick Start
//!
//! The [`Quantizer`] builder is the primary entry point:
//!
//! ```
//! use kmeans_palette::{PixelBuffer, Quantizer, Rgb8};
//!
//! let pixels = vec![Rgb8::new(200, 30, 30); 16];
//! let buffer = PixelBuffer::from_pixels(4, 4, &pixels).unwrap();
//!
//! let quantized = Quantizer::new(8).seed(0).quantize(&buffer).unwrap();
//! assert_eq!(quantized.image.palette().len(), 1);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! PixelBuffer ──> samples ──> cluster() ──> Palette + partial labels
//!                                               │
//!                         remap() <─────────────┘
//!                            │
//!                        IndexImage
//! ```
//!
//! # Determinism
//!
//! All randomness (k-means++ seeding and mini-batch sampling) is drawn from
//! a generator seeded by [`ClusterOptions::seed`]. The same pixels, `k`,
//! and options always produce a byte-identical palette.
//!
//! # Distance
//!
//! Clustering and matching both use squared Euclidean distance in 8-bit
//! RGB. Ties go to the lowest palette index.

pub mod api;
pub mod cluster;
pub mod color;
pub mod output;
pub mod palette;
pub mod pixels;
pub mod remap;


pub use api::{QuantizeError, Quantized, Quantizer};
pub use cluster::{cluster, ClusterError, ClusterOptions, Clustering};
pub use color::Rgb8;
pub use output::IndexImage;
pub use palette::{Palette, PaletteError, MAX_PALETTE_SIZE};
pub use pixels::{BufferSizeError, PixelBuffer};
pub use remap::remap;
