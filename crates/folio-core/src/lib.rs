//! Folio Core: shared errors and utilities.
//!
//! This crate provides the foundational types used across all Folio crates.
//! It has no internal Folio dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`util`]: File discovery, identifier and slug utilities

pub mod error;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};

// Convenience re-exports from util
pub use util::files::{find_all_files, read_file, FileInfo, FindOptions};
pub use util::ids::{normalize_id, slugify};
