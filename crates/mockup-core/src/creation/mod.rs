//! Packaging a mockup directory for upload.

pub mod filters;
pub mod walker;
pub mod zip;

pub use walker::MockupWalker;
pub use walker::WalkedEntry;
pub use walker::contains_extension;
