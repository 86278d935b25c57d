//! Optional lossless post-processing of written PNG files.
//!
//! A [`PostProcessor`] receives the path of a freshly written palette PNG,
//! may rewrite it in place, and returns the resulting size. It must never
//! change the decoded pixels.

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::EncodeError;

/// Rewrites a PNG file in place and returns its new size in bytes.
pub trait PostProcessor: Send + Sync {
    fn process(&self, path: &Path) -> Result<u64, EncodeError>;
}

impl<F> PostProcessor for F
where
    F: Fn(&Path) -> Result<u64, EncodeError> + Send + Sync,
{
    fn process(&self, path: &Path) -> Result<u64, EncodeError> {
        self(path)
    }
}

/// Leaves the file untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOptimizer;

impl PostProcessor for NoopOptimizer {
    fn process(&self, path: &Path) -> Result<u64, EncodeError> {
        Ok(fs::metadata(path)?.len())
    }
}

/// Re-compresses with oxipng and keeps the result only if it is smaller.
///
/// Optimizer failures are logged and the original file is kept; only I/O
/// errors reading or rewriting the file are reported.
pub struct OxipngOptimizer {
    options: oxipng::Options,
}

impl OxipngOptimizer {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            options: oxipng::Options {
                strip: oxipng::StripChunks::Safe,
                optimize_alpha: false,
                timeout,
                ..Default::default()
            },
        }
    }
}

impl Default for OxipngOptimizer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PostProcessor for OxipngOptimizer {
    fn process(&self, path: &Path) -> Result<u64, EncodeError> {
        let original = fs::read(path)?;
        match oxipng::optimize_from_memory(&original, &self.options) {
            Ok(optimized) if optimized.len() < original.len() => {
                fs::write(path, &optimized)?;
                tracing::debug!(
                    path = %path.display(),
                    before = original.len(),
                    after = optimized.len(),
                    "Optimized PNG"
                );
                Ok(optimized.len() as u64)
            }
            Ok(_) => Ok(original.len() as u64),
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "PNG optimization failed, keeping encoder output");
                Ok(original.len() as u64)
            }
        }
    }
}
