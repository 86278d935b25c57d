use kmeans_palette::Quantizer;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{CompressError, DecodeError, EncodeError};
use crate::models::{AppConfig, CompressionResult, Outcome};
use crate::rendering::{load_rgb, write_indexed_png, NoopOptimizer, OxipngOptimizer, PngEffort, PostProcessor};

/// Prefix of the temporary files written next to the destination.
const TEMP_PREFIX: &str = ".palettize-";

/// Per-file pipeline: load → quantize → encode → optimize → decide.
///
/// `compress_file` has no side effects beyond the destination path and a
/// temporary file beside it, which is always gone when the call returns.
pub struct Compressor {
    quantizer: Quantizer,
    post_processor: Box<dyn PostProcessor>,
    effort: PngEffort,
}

impl Compressor {
    /// Build a compressor from configuration, with oxipng if `optimize` is set.
    pub fn new(config: &AppConfig) -> Self {
        let compressor = Self {
            quantizer: config.quantizer(),
            post_processor: Box::new(NoopOptimizer),
            effort: PngEffort::Best,
        };
        if config.optimize {
            compressor
                .with_post_processor(OxipngOptimizer::new(config.optimizer_timeout()))
                .with_effort(PngEffort::Fast)
        } else {
            compressor
        }
    }

    /// Replace the post-processing step. The encoder effort is unchanged.
    pub fn with_post_processor(mut self, post_processor: impl PostProcessor + 'static) -> Self {
        self.post_processor = Box::new(post_processor);
        self
    }

    /// Set how hard the PNG encoder compresses before post-processing.
    pub fn with_effort(mut self, effort: PngEffort) -> Self {
        self.effort = effort;
        self
    }

    pub fn effort(&self) -> PngEffort {
        self.effort
    }

    /// Disable post-processing and let the encoder compress as hard as it can.
    pub fn without_post_processor(mut self) -> Self {
        self.post_processor = Box::new(NoopOptimizer);
        self.effort = PngEffort::Best;
        self
    }

    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    /// Compress `source` into `destination`.
    ///
    /// The destination ends up holding either the palette PNG (when strictly
    /// smaller than the source) or a byte-identical copy of the source. When
    /// both paths name the same file, fallback leaves the source untouched.
    pub fn compress_file(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<CompressionResult, CompressError> {
        let source_meta = fs::metadata(source).map_err(|e| DecodeError::Io {
            path: source.to_path_buf(),
            source: e,
        })?;
        let source_size = source_meta.len();
        let buffer = load_rgb(source)?;
        let (width, height) = (buffer.width(), buffer.height());

        let quantized = self.quantizer.quantize(&buffer)?;
        drop(buffer);
        let image = quantized.image;
        tracing::debug!(
            file = %source.display(),
            colors = image.palette().len(),
            iterations = quantized.iterations,
            converged = quantized.converged,
            "Quantized"
        );

        let dest_dir = parent_dir(destination);
        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".png")
            .tempfile_in(&dest_dir)
            .map_err(|e| CompressError::Destination {
                path: dest_dir.clone(),
                source: e,
            })?;

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            write_indexed_png(&mut writer, &image, self.effort)?;
            writer.flush().map_err(EncodeError::from)?;
        }
        let encoded_size = self.post_processor.process(temp.path())?;

        let outcome = Outcome::decide(encoded_size, source_size);
        match outcome {
            Outcome::QuantizedKept => {
                let persist_error = |source| CompressError::Persist {
                    path: destination.to_path_buf(),
                    source,
                };
                temp.persist(destination)
                    .map_err(|e| persist_error(e.error))?;
                // Temporary files are created owner-only
                fs::set_permissions(destination, source_meta.permissions())
                    .map_err(persist_error)?;
            }
            Outcome::FallbackCopy => {
                // Dropping the handle removes the temporary file
                drop(temp);
                if is_same_file(source, destination) {
                    tracing::debug!(file = %source.display(), "Source is destination, nothing to copy");
                } else {
                    fs::copy(source, destination).map_err(|e| CompressError::Copy {
                        from: source.to_path_buf(),
                        to: destination.to_path_buf(),
                        source: e,
                    })?;
                }
            }
        }

        let result = CompressionResult {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source_size,
            encoded_size,
            destination_size: outcome.destination_size(encoded_size, source_size),
            outcome,
            width,
            height,
            palette_size: image.palette().len(),
            iterations: Some(quantized.iterations),
        };

        match outcome {
            Outcome::QuantizedKept => tracing::info!(
                file = %result.file_name(),
                source_size,
                encoded_size,
                iterations = quantized.iterations,
                "Kept quantized image"
            ),
            Outcome::FallbackCopy => tracing::info!(
                file = %result.file_name(),
                source_size,
                encoded_size,
                "Quantized image not smaller, copied original"
            ),
        }

        Ok(result)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Whether both paths resolve to the same existing file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_dir_of_bare_name() {
        assert_eq!(parent_dir(Path::new("a.png")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("out/a.png")), PathBuf::from("out"));
    }

    #[test]
    fn test_is_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        fs::write(&a, b"x").unwrap();
        let dotted = dir.path().join(".").join("a.png");

        assert!(is_same_file(&a, &dotted));
        assert!(!is_same_file(&a, &dir.path().join("missing.png")));
    }

    #[test]
    fn test_optimize_flag_selects_effort() {
        let mut config = AppConfig::default();
        config.optimize = false;
        assert_eq!(Compressor::new(&config).effort, PngEffort::Best);

        config.optimize = true;
        assert_eq!(Compressor::new(&config).effort, PngEffort::Fast);
        assert_eq!(
            Compressor::new(&config).without_post_processor().effort,
            PngEffort::Best
        );
    }

    #[test]
    fn test_post_processor_keeps_effort() {
        let mut config = AppConfig::default();
        config.optimize = false;
        let identity = |path: &Path| -> Result<u64, EncodeError> { Ok(fs::metadata(path)?.len()) };

        let compressor = Compressor::new(&config).with_post_processor(identity);
        assert_eq!(compressor.effort(), PngEffort::Best);
        assert_eq!(
            compressor.with_effort(PngEffort::Fast).effort(),
            PngEffort::Fast
        );
    }
}
