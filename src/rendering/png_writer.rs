use kmeans_palette::IndexImage;
use std::io::{Cursor, Write};

use crate::error::EncodeError;

/// How hard the encoder itself should compress.
///
/// `Fast` is meant for output that a lossless optimizer re-compresses
/// afterwards anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PngEffort {
    Fast,
    #[default]
    Best,
}

/// Smallest indexed bit depth able to address `palette_len` entries.
pub fn bit_depth_for(palette_len: usize) -> (png::BitDepth, u8) {
    match palette_len {
        0..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        5..=16 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    }
}

/// Write `image` as an indexed-color PNG (color type 3 with PLTE chunk).
pub fn write_indexed_png<W: Write>(
    writer: W,
    image: &IndexImage,
    effort: PngEffort,
) -> Result<(), EncodeError> {
    let (depth, bits) = bit_depth_for(image.palette().len());
    let plte = image.palette().to_rgb_table();
    let packed = if bits == 8 {
        image.indices().to_vec()
    } else {
        pack_nbits(image.indices(), image.width(), bits)
    };

    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(depth);
    encoder.set_palette(plte);
    match effort {
        PngEffort::Fast => {
            encoder.set_compression(png::Compression::Fast);
            encoder.set_filter(png::FilterType::NoFilter);
        }
        PngEffort::Best => {
            encoder.set_compression(png::Compression::Best);
            encoder.set_adaptive_filter(png::AdaptiveFilterType::Adaptive);
        }
    }

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&packed)?;
    writer.finish()?;
    Ok(())
}

/// Encode `image` as an indexed PNG in memory.
pub fn encode_indexed_png(image: &IndexImage, effort: PngEffort) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Cursor::new(Vec::new());
    write_indexed_png(&mut buf, image, effort)?;
    Ok(buf.into_inner())
}

/// Pack pixel values into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = indices.len() / width as usize;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width as usize) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmeans_palette::{Palette, Rgb8};
    use pretty_assertions::assert_eq;

    fn palette(n: usize) -> Palette {
        let colors: Vec<Rgb8> = (0..n)
            .map(|i| Rgb8::new(i as u8, (i * 7 % 256) as u8, 255 - i as u8))
            .collect();
        Palette::new(&colors).unwrap()
    }

    fn indexed(width: u32, height: u32, n: usize) -> IndexImage {
        let indices = (0..width * height).map(|i| (i as usize % n) as u8).collect();
        IndexImage::new(indices, width, height, palette(n))
    }

    #[test]
    fn test_bit_depth_for() {
        assert_eq!(bit_depth_for(1).1, 1);
        assert_eq!(bit_depth_for(2).1, 1);
        assert_eq!(bit_depth_for(3).1, 2);
        assert_eq!(bit_depth_for(16).1, 4);
        assert_eq!(bit_depth_for(17).1, 8);
        assert_eq!(bit_depth_for(256).1, 8);
    }

    #[test]
    fn test_pack_nbits_pads_rows() {
        // 3 pixels at 2 bits: one byte per row, low bits zero
        let packed = pack_nbits(&[1, 2, 3, 3, 2, 1], 3, 2);
        assert_eq!(packed, vec![0b0110_1100, 0b1110_0100]);
    }

    #[test]
    fn test_pack_nbits_one_bit() {
        let packed = pack_nbits(&[1, 0, 1, 1, 0, 0, 0, 1, 1], 9, 1);
        assert_eq!(packed, vec![0b1011_0001, 0b1000_0000]);
    }

    #[test]
    fn test_encoded_png_has_signature_and_palette() {
        let bytes = encode_indexed_png(&indexed(5, 3, 3), PngEffort::Best).unwrap();
        assert_eq!(&bytes[0..8], b"\x89PNG\r\n\x1a\n");

        let decoder = png::Decoder::new(Cursor::new(&bytes));
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!(info.color_type, png::ColorType::Indexed);
        assert_eq!(info.bit_depth, png::BitDepth::Two);
        assert_eq!(info.palette.as_deref(), Some(palette(3).to_rgb_table().as_slice()));
    }

    #[test]
    fn test_roundtrip_reproduces_palette_colors() {
        for (n, width) in [(1usize, 7u32), (2, 9), (4, 5), (16, 11), (200, 13)] {
            for effort in [PngEffort::Fast, PngEffort::Best] {
                let image = indexed(width, 4, n);
                let bytes = encode_indexed_png(&image, effort).unwrap();
                let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
                assert_eq!(decoded.dimensions(), (width, 4));
                assert_eq!(decoded.into_raw(), image.to_rgb(), "n={n} width={width}");
            }
        }
    }
}
