//! Decoded RGB pixel matrix.
//!
//! [`PixelBuffer`] is the hand-off point between the image decoder and the
//! quantizer. It is immutable once built and always holds exactly three
//! 8-bit channels per pixel in red-green-blue order.

use std::fmt;

use crate::color::Rgb8;

/// Number of channels stored per pixel.
pub const CHANNELS: usize = 3;

/// Error returned when raw bytes do not describe a `width x height` RGB image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSizeError {
    /// Byte length required by the dimensions (`width * height * 3`)
    pub expected: usize,
    /// Byte length actually supplied
    pub actual: usize,
}

impl fmt::Display for BufferSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pixel buffer has {} bytes, expected {}",
            self.actual, self.expected
        )
    }
}

impl std::error::Error for BufferSizeError {}

/// An RGB image as a flat, row-major byte array.
///
/// # Example
///
/// ```
/// use kmeans_palette::{PixelBuffer, Rgb8};
///
/// let buffer = PixelBuffer::new(2, 1, vec![255, 0, 0, 0, 0, 255]).unwrap();
/// assert_eq!(buffer.pixel_count(), 2);
/// assert_eq!(buffer.pixel(1), Rgb8::new(0, 0, 255));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGB bytes, checking that `data.len() == width * height * 3`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BufferSizeError> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(BufferSizeError {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer from one color per pixel, row-major.
    pub fn from_pixels(width: u32, height: u32, pixels: &[Rgb8]) -> Result<Self, BufferSizeError> {
        let data = pixels.iter().flat_map(|c| c.to_bytes()).collect();
        Self::new(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw RGB bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Color of the pixel at row-major position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.pixel_count()`.
    #[inline]
    pub fn pixel(&self, index: usize) -> Rgb8 {
        let i = index * CHANNELS;
        Rgb8::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Iterate over every pixel as an independent color sample.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = Rgb8> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|p| Rgb8::new(p[0], p[1], p[2]))
    }

    /// Flatten into a vector of color samples.
    pub fn to_samples(&self) -> Vec<Rgb8> {
        self.samples().collect()
    }
}
