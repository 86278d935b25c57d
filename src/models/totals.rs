use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use super::result::{savings_percent, CompressionResult};

/// Running totals over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchTotals {
    pub count: usize,
    pub source_bytes: u64,
    pub destination_bytes: u64,
}

impl BatchTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one resolved file.
    pub fn record(&mut self, result: &CompressionResult) {
        self.record_sizes(result.source_size, result.destination_size);
    }

    pub fn record_sizes(&mut self, source_size: u64, destination_size: u64) {
        self.count += 1;
        self.source_bytes += source_size;
        self.destination_bytes += destination_size;
    }

    /// Overall percentage saved; `None` while no source bytes were counted.
    pub fn savings_percent(&self) -> Option<f64> {
        savings_percent(self.source_bytes, self.destination_bytes)
    }
}

impl fmt::Display for BatchTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            return write!(f, "No input files");
        }
        write!(
            f,
            "Total {} files compressed    {}B -> {}B",
            self.count, self.source_bytes, self.destination_bytes
        )?;
        if let Some(pct) = self.savings_percent() {
            write!(f, "   {pct:.2}% off!")?;
        }
        Ok(())
    }
}

/// A file left out of the batch, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

impl SkippedFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl fmt::Display for SkippedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} skip ({})", self.file_name(), self.reason)
    }
}

/// Everything a batch run produced.
///
/// Skipped files are reported but do not count toward `totals`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub results: Vec<CompressionResult>,
    pub skipped: Vec<SkippedFile>,
    pub totals: BatchTotals,
    /// Set when the run stopped early on a cancellation request
    pub cancelled: bool,
}

impl BatchReport {
    pub fn push_result(&mut self, result: CompressionResult) {
        self.totals.record(&result);
        self.results.push(result);
    }

    pub fn push_skipped(&mut self, skipped: SkippedFile) {
        self.skipped.push(skipped);
    }

    pub fn fallback_count(&self) -> usize {
        self.results.iter().filter(|r| r.used_fallback()).count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "{result}")?;
        }
        for skipped in &self.skipped {
            writeln!(f, "{skipped}")?;
        }
        if self.cancelled {
            writeln!(f, "Cancelled")?;
        }
        write!(f, "{}", self.totals)
    }
}
