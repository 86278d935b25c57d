pub mod batch;
pub mod compressor;

pub use batch::{BatchEvent, BatchRunner, CancelFlag};
pub use compressor::Compressor;
