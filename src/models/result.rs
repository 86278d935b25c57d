use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Terminal state of the per-file decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The palette-encoded file was strictly smaller and is the destination
    QuantizedKept,
    /// The destination is a byte-identical copy of the source
    FallbackCopy,
}

impl Outcome {
    /// Keep the quantized file only when it is strictly smaller.
    pub fn decide(encoded_size: u64, source_size: u64) -> Self {
        if encoded_size < source_size {
            Outcome::QuantizedKept
        } else {
            Outcome::FallbackCopy
        }
    }

    /// Size the destination ends up with under this outcome.
    pub fn destination_size(self, encoded_size: u64, source_size: u64) -> u64 {
        match self {
            Outcome::QuantizedKept => encoded_size,
            Outcome::FallbackCopy => source_size,
        }
    }
}

/// Record of one processed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionResult {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub source_size: u64,
    /// Size of the palette-encoded file, after optional re-optimization
    pub encoded_size: u64,
    /// Final size on disk at `destination`
    pub destination_size: u64,
    pub outcome: Outcome,
    pub width: u32,
    pub height: u32,
    pub palette_size: usize,
    /// Mini-batch steps (0 when the palette was exact)
    pub iterations: Option<usize>,
}

impl CompressionResult {
    pub fn used_fallback(&self) -> bool {
        self.outcome == Outcome::FallbackCopy
    }

    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    /// Percentage saved relative to the source, if the source is non-empty.
    pub fn savings_percent(&self) -> Option<f64> {
        savings_percent(self.source_size, self.destination_size)
    }
}

/// `100 * (1 - destination / source)`, undefined for an empty source.
pub fn savings_percent(source: u64, destination: u64) -> Option<f64> {
    if source == 0 {
        return None;
    }
    Some(100.0 * (1.0 - destination as f64 / source as f64))
}

impl fmt::Display for CompressionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{})", self.file_name(), self.width, self.height)?;
        match self.outcome {
            Outcome::FallbackCopy => write!(f, "   Just copied"),
            Outcome::QuantizedKept => {
                write!(
                    f,
                    "   KMeans iterations={}   {}B -> {}B",
                    self.iterations.unwrap_or(0),
                    self.source_size,
                    self.destination_size
                )?;
                if let Some(pct) = self.savings_percent() {
                    write!(f, "   {pct:.2}% off!")?;
                }
                Ok(())
            }
        }
    }
}
