//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects beyond the
//! `canonicalize` fallback in [`normalize_path`].

pub mod fs;

pub use fs::{clean_path, normalize_path, relative_to, to_import_specifier, to_slash};
