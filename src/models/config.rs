use kmeans_palette::{ClusterOptions, Quantizer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Smallest palette the compressor will request.
pub const MIN_QUANTIZATION_LEVEL: u32 = 2;
/// Largest palette a one-byte index can address.
pub const MAX_QUANTIZATION_LEVEL: u32 = 256;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Requested palette size (clamped into 2..=256 when used)
    pub quantization_level: u32,

    /// Seed for centroid initialization and batch sampling
    pub seed: u64,

    /// Cap on mini-batch steps per image
    pub max_iterations: usize,

    /// Samples drawn per mini-batch step
    pub batch_size: usize,

    /// Convergence threshold on total squared centroid movement
    pub tolerance: f32,

    /// Steps without inertia improvement before stopping early
    pub max_no_improvement: Option<usize>,

    /// Run the lossless PNG optimizer on every quantized file
    pub optimize: bool,

    /// Upper bound on optimizer time per file, in seconds
    pub optimizer_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let cluster = ClusterOptions::default();
        Self {
            quantization_level: MAX_QUANTIZATION_LEVEL,
            seed: cluster.seed,
            max_iterations: cluster.max_iterations,
            batch_size: cluster.batch_size,
            tolerance: cluster.tolerance,
            max_no_improvement: cluster.max_no_improvement,
            optimize: true,
            optimizer_timeout_secs: Some(30),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            quantization_level = config.quantization_level(),
            optimize = config.optimize,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Requested palette size, clamped into the supported range.
    pub fn quantization_level(&self) -> usize {
        self.quantization_level
            .clamp(MIN_QUANTIZATION_LEVEL, MAX_QUANTIZATION_LEVEL) as usize
    }

    pub fn cluster_options(&self) -> ClusterOptions {
        ClusterOptions::new()
            .seed(self.seed)
            .batch_size(self.batch_size)
            .max_iterations(self.max_iterations)
            .tolerance(self.tolerance)
            .max_no_improvement(self.max_no_improvement)
    }

    pub fn quantizer(&self) -> Quantizer {
        Quantizer::new(self.quantization_level()).with_options(self.cluster_options())
    }

    pub fn optimizer_timeout(&self) -> Option<Duration> {
        self.optimizer_timeout_secs.map(Duration::from_secs)
    }
}
