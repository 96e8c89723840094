//! Utility modules for file discovery and identifier handling.
//!
//! # Modules
//!
//! - [`files`]: Async content file discovery and reading
//! - [`ids`]: ID normalization and slug computation

pub mod files;
pub mod ids;
