//! Public API for the kmeans-palette crate.
//!
//! This module provides the high-level API: [`Quantizer`] builder and
//! [`QuantizeError`] unified error type.

mod builder;
mod error;

pub use builder::{Quantized, Quantizer};
pub use error::QuantizeError;
