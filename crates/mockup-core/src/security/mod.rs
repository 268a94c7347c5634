//! Containment and resource checks applied during extraction.

pub mod path;
pub mod quota;

pub use path::clean_path;
pub use path::contained_join;
pub use path::is_single_component;
pub use quota::QuotaTracker;
