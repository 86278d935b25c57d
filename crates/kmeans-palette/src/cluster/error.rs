//! Error type for clustering

use std::fmt;

/// Error returned by [`cluster()`](super::cluster).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    /// No samples to cluster
    EmptySamples,
    /// `k` was zero
    ZeroClusters,
    /// `k` exceeds the addressable palette size
    TooManyClusters {
        /// Requested number of clusters
        requested: usize,
    },
}

impl fmt::Display for ClusterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterError::EmptySamples => write!(f, "cannot cluster an empty sample set"),
            ClusterError::ZeroClusters => write!(f, "number of clusters must be at least 1"),
            ClusterError::TooManyClusters { requested } => write!(
                f,
                "requested {} clusters, at most {} are supported",
                requested,
                crate::palette::MAX_PALETTE_SIZE
            ),
        }
    }
}

impl std::error::Error for ClusterError {}
