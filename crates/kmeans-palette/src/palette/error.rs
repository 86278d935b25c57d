//! Error types for palette construction

use std::fmt;

/// Error type for palette validation.
///
/// Returned when a palette would be empty or would not fit in a one-byte
/// index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// No colors provided
    EmptyPalette,
    /// More colors than a one-byte index can address
    TooManyColors {
        /// Number of colors supplied
        len: usize,
    },
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::EmptyPalette => write!(f, "palette cannot be empty"),
            PaletteError::TooManyColors { len } => write!(
                f,
                "palette has {} colors, at most {} are supported",
                len,
                super::MAX_PALETTE_SIZE
            ),
        }
    }
}

impl std::error::Error for PaletteError {}
