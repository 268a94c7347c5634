//! Archive extraction into version directories.

mod engine;

pub use engine::SecureExtractor;
