//! Palette types
//!
//! A [`Palette`] is the ordered table of representative colors produced by
//! clustering. Its position in the table is the index written to the
//! palette-indexed output.

mod error;
mod palette;

pub use error::PaletteError;
pub use palette::{Palette, MAX_PALETTE_SIZE};
