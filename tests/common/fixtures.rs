//! Test fixtures: synthetic images in temporary directories.

use image::{ImageFormat, Rgb, RgbImage};
use palettize::models::AppConfig;
use palettize::services::Compressor;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch area with separate source and destination directories.
pub struct TestDirs {
    _root: TempDir,
    pub source: PathBuf,
    pub dest: PathBuf,
}

impl TestDirs {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let source = root.path().join("source");
        let dest = root.path().join("dest");
        fs::create_dir(&source).expect("create source dir");
        Self {
            _root: root,
            source,
            dest,
        }
    }

    /// Write `image` into the source directory in the given format.
    pub fn add_image(&self, name: &str, image: &RgbImage, format: ImageFormat) -> PathBuf {
        write_image(&self.source.join(name), image, format)
    }

    pub fn add_file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.source.join(name);
        fs::write(&path, content).expect("write fixture file");
        path
    }
}

pub fn write_image(path: &Path, image: &RgbImage, format: ImageFormat) -> PathBuf {
    image
        .save_with_format(path, format)
        .expect("encode fixture image");
    path.to_path_buf()
}

/// Smooth two-axis gradient with many distinct colors.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) * 127 / (width + height).max(1)) as u8,
        ])
    })
}

/// Image built from only the given colors, repeated row by row.
pub fn few_colors(width: u32, height: u32, colors: &[[u8; 3]]) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb(colors[((y * width + x) as usize) % colors.len()])
    })
}

/// Config for fast, deterministic runs without oxipng.
pub fn test_config(quantization_level: u32) -> AppConfig {
    AppConfig {
        quantization_level,
        optimize: false,
        ..AppConfig::default()
    }
}

pub fn test_compressor(quantization_level: u32) -> Compressor {
    Compressor::new(&test_config(quantization_level))
}

pub fn decode(path: &Path) -> RgbImage {
    image::ImageReader::open(path)
        .expect("open output")
        .with_guessed_format()
        .expect("guess format")
        .decode()
        .expect("decode output")
        .to_rgb8()
}

pub fn distinct_colors(image: &RgbImage) -> usize {
    let mut colors: Vec<[u8; 3]> = image.pixels().map(|p| p.0).collect();
    colors.sort_unstable();
    colors.dedup();
    colors.len()
}
