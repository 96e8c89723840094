//! CLI argument parsing and command definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Load, validate, and list static-blog content files.
#[derive(Parser, Debug)]
#[command(name = "folio", author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "FOLIO_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a content directory and report every problem found.
    Check {
        /// Content directory (defaults to `content.path`, then `.`).
        dir: Option<PathBuf>,

        /// Treat body errors as failures.
        #[arg(long)]
        strict: bool,

        /// Number of files to process concurrently.
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// List documents newest first.
    List {
        /// Content directory (defaults to `content.path`, then `.`).
        dir: Option<PathBuf>,

        /// Only documents carrying this tag.
        #[arg(short, long)]
        tag: Option<String>,

        /// Only documents in this category.
        #[arg(long)]
        category: Option<String>,
    },

    /// Print one document as JSON.
    Show {
        /// Content file to load.
        file: PathBuf,
    },

    /// Print version information.
    Version,

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "loader.strict").
        key: String,
    },

    /// Set a configuration value by dotted key.
    Set {
        /// Dotted key (e.g., "loader.strict").
        key: String,

        /// Value to set.
        value: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
