//! Unified error type for the kmeans-palette public API.

use crate::cluster::ClusterError;
use std::fmt;

/// Unified error type for the kmeans-palette public API.
///
/// Wraps the errors [`Quantizer::quantize`](crate::Quantizer::quantize) can
/// hit for convenient `?` propagation in application code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantizeError {
    /// Clustering failed (empty input or invalid cluster count)
    Cluster(ClusterError),
}

impl fmt::Display for QuantizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantizeError::Cluster(err) => write!(f, "clustering error: {}", err),
        }
    }
}

impl std::error::Error for QuantizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuantizeError::Cluster(err) => Some(err),
        }
    }
}

impl From<ClusterError> for QuantizeError {
    fn from(err: ClusterError) -> Self {
        QuantizeError::Cluster(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_cluster_error_is_source() {
        let err = QuantizeError::from(ClusterError::EmptySamples);
        assert!(err.to_string().starts_with("clustering error: "));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source, Some(ClusterError::EmptySamples.to_string()));
    }
}
