//! Palettize - lossy PNG size reduction
//!
//! Re-encodes every image of a directory as a palette PNG whose colors come
//! from mini-batch k-means, keeping the result only when it beats the
//! original on byte size. This library exposes modules for integration
//! testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
