use std::path::PathBuf;

use thiserror::Error;

use crate::models::BatchReport;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot decode {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid pixel layout in {}: {source}", .path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: kmeans_palette::BufferSizeError,
    },
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("PNG encode error: {0}")]
    Png(#[from] png::EncodingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure while compressing a single file.
///
/// Use [`CompressError::is_batch_fatal`] to decide whether the batch can
/// continue with the next file.
#[derive(Debug, Error)]
pub enum CompressError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Clustering error: {0}")]
    Clustering(#[from] kmeans_palette::QuantizeError),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Cannot create output in {}: {source}", .path.display())]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move quantized output to {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompressError {
    /// Errors that mean the destination itself is unusable.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(
            self,
            CompressError::Destination { .. }
                | CompressError::Copy { .. }
                | CompressError::Persist { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Cannot read source directory {}: {source}", .path.display())]
    SourceDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot prepare destination directory {}: {source}", .path.display())]
    DestinationDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Batch aborted after {count} files: {source}", count = .report.totals.count)]
    Aborted {
        #[source]
        source: CompressError,
        /// Files completed before the failure
        report: Box<BatchReport>,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
