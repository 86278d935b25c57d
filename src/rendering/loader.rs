use image::ImageReader;
use kmeans_palette::PixelBuffer;
use std::path::Path;

use crate::error::DecodeError;

/// Decode any supported raster file into an RGB [`PixelBuffer`].
///
/// The format is sniffed from the file content, not the extension. Alpha is
/// dropped, grayscale is expanded to three identical channels, and palette
/// images are expanded to their colors.
pub fn load_rgb(path: &Path) -> Result<PixelBuffer, DecodeError> {
    let io_error = |source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .map_err(io_error)?
        .with_guessed_format()
        .map_err(io_error)?;

    let image = reader.decode().map_err(|source| DecodeError::Image {
        path: path.to_path_buf(),
        source,
    })?;

    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    tracing::debug!(path = %path.display(), width, height, "Decoded image");

    PixelBuffer::new(width, height, rgb.into_raw()).map_err(|source| DecodeError::Layout {
        path: path.to_path_buf(),
        source,
    })
}
