//! # folio-cli
//!
//! The `folio` command-line tool for static-blog content directories.
//!
//! - `check`: load a directory and report failures and body diagnostics
//! - `list`: print documents newest first, optionally filtered
//! - `show`: print one document as JSON
//! - `config`: inspect and edit the configuration file

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod content_handlers;

pub use app::{FolioCli, Outcome};
pub use cli::{CliArgs, Command, ConfigAction, ConfigCommand};
pub use config::FolioConfig;
