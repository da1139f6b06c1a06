//! Shared utilities
//!
//! - [`fs`] - atomic writes for generated files
//! - [`case`] - identifier and label case conversion

pub mod case;
pub mod fs;

pub use case::{class_name, machine_name, readable, sentence, split_class};
pub use fs::{atomic_write, ensure_dir, safe_write};
