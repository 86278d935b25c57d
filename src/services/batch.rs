use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::BatchError;
use crate::models::{BatchReport, CompressionResult, SkippedFile};
use crate::services::Compressor;

/// Cooperative cancellation shared between the runner and a signal source.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress notification emitted once per resolved file.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    Compressed(&'a CompressionResult),
    Skipped(&'a SkippedFile),
}

/// Runs the [`Compressor`] over every regular file of a directory.
///
/// Files are processed in name order. Per-file failures become
/// [`SkippedFile`] entries; destination failures abort the batch and
/// return what was completed so far inside [`BatchError::Aborted`].
pub struct BatchRunner {
    compressor: Compressor,
    cancel: CancelFlag,
}

impl BatchRunner {
    pub fn new(compressor: Compressor) -> Self {
        Self {
            compressor,
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle for requesting cancellation from another thread.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn compressor(&self) -> &Compressor {
        &self.compressor
    }

    pub fn run(&self, source_dir: &Path, dest_dir: &Path) -> Result<BatchReport, BatchError> {
        self.run_with(source_dir, dest_dir, |_| {})
    }

    /// Like [`run`](Self::run), calling `on_event` after each file.
    pub fn run_with<F>(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
        mut on_event: F,
    ) -> Result<BatchReport, BatchError>
    where
        F: FnMut(&BatchEvent<'_>),
    {
        let files = list_files(source_dir)?;
        fs::create_dir_all(dest_dir).map_err(|e| BatchError::DestinationDir {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        tracing::info!(
            source = %source_dir.display(),
            destination = %dest_dir.display(),
            files = files.len(),
            "Starting batch"
        );

        let mut report = BatchReport::default();
        for source in files {
            if self.cancel.is_cancelled() {
                tracing::warn!(completed = report.totals.count, "Batch cancelled");
                report.cancelled = true;
                break;
            }

            let Some(name) = source.file_name() else {
                continue;
            };
            let destination = dest_dir.join(name);

            match self.compressor.compress_file(&source, &destination) {
                Ok(result) => {
                    on_event(&BatchEvent::Compressed(&result));
                    report.push_result(result);
                }
                Err(e) if e.is_batch_fatal() => {
                    tracing::error!(file = %source.display(), error = %e, "Aborting batch");
                    return Err(BatchError::Aborted {
                        source: e,
                        report: Box::new(report),
                    });
                }
                Err(e) => {
                    tracing::warn!(file = %source.display(), error = %e, "Skipping file");
                    let skipped = SkippedFile {
                        path: source,
                        reason: e.to_string(),
                    };
                    on_event(&BatchEvent::Skipped(&skipped));
                    report.push_skipped(skipped);
                }
            }
        }

        tracing::info!(
            files = report.totals.count,
            skipped = report.skipped.len(),
            source_bytes = report.totals.source_bytes,
            destination_bytes = report.totals.destination_bytes,
            "Batch finished"
        );
        Ok(report)
    }
}

/// Regular files directly inside `dir`, sorted by file name.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let dir_error = |e| BatchError::SourceDir {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(dir_error)? {
        let entry = entry.map_err(dir_error)?;
        // Follows symlinks, so a link to a regular file counts
        match fs::metadata(entry.path()) {
            Ok(meta) if meta.is_file() => files.push(entry.path()),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), error = %e, "Ignoring entry");
            }
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
