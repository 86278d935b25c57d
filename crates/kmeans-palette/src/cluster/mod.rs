//! Color clustering
//!
//! Partitions a set of color samples into at most `k` clusters with a seeded
//! mini-batch k-means. The same samples, `k`, and [`ClusterOptions`] always
//! produce the same [`Clustering`].
//!
//! The pipeline is:
//!
//! ```text
//! samples ──> distinct-color check ──(<= k colors)──> exact palette
//!                   │
//!                   └──(> k colors)──> k-means++ seeding
//!                                          │
//!                                    mini-batch refinement
//!                                          │
//!                                  rounded palette + labels
//! ```

mod error;
mod minibatch;
mod options;
mod seeding;

pub use error::ClusterError;
pub use minibatch::{cluster, Clustering};
pub use options::ClusterOptions;
