pub mod loader;
pub mod optimizer;
pub mod png_writer;

pub use loader::load_rgb;
pub use optimizer::{NoopOptimizer, OxipngOptimizer, PostProcessor};
pub use png_writer::{encode_indexed_png, write_indexed_png, PngEffort};
