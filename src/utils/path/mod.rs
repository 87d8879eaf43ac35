//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `has_hidden_component`)

pub mod fs;

pub use fs::{has_hidden_component, normalize_path};
