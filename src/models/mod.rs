pub mod config;
pub mod result;
pub mod totals;

pub use config::AppConfig;
pub use result::{CompressionResult, Outcome};
pub use totals::{BatchReport, BatchTotals, SkippedFile};
