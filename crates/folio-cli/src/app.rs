//! FolioCli application.
//!
//! Ties parsed arguments, configuration, and logging together and
//! dispatches each command to its handler.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use folio_core::Result;
use tracing_subscriber::EnvFilter;

use crate::cli::{CliArgs, Command};
use crate::config::FolioConfig;
use crate::config_handlers;
use crate::content_handlers::{self, ListFilter};

// ============================================================================
// Outcome
// ============================================================================

/// Result of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything checked out.
    Success,
    /// The command ran but found problems (e.g. excluded files).
    Failed,
}

impl Outcome {
    /// Process exit code for this outcome.
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Success => ExitCode::SUCCESS,
            Self::Failed => ExitCode::FAILURE,
        }
    }
}

// ============================================================================
// FolioCli
// ============================================================================

/// The `folio` application.
pub struct FolioCli {
    name: String,
    config: Arc<FolioConfig>,
    version: String,
}

impl FolioCli {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config = FolioConfig::load(args.config.as_deref())?;
        Ok(Self::new(name, config))
    }

    /// Create a new CLI application.
    pub fn new(name: impl Into<String>, config: FolioConfig) -> Self {
        Self {
            name: name.into(),
            config: Arc::new(config),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // A subscriber may already be installed (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run the CLI with the given arguments, writing command output to stdout.
    pub async fn run(&self, args: CliArgs) -> Result<Outcome> {
        self.init_logging(args.verbose, args.quiet);
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(args, &mut out).await
    }

    /// Run the CLI with the given arguments, writing command output to `out`.
    pub async fn run_with_output(&self, args: CliArgs, out: &mut impl Write) -> Result<Outcome> {
        match args.command {
            Some(Command::Check { dir, strict, jobs }) => {
                let mut options = self.config.loader_options();
                if strict {
                    options = options.with_strict(true);
                }
                if let Some(jobs) = jobs {
                    options = options.with_concurrency(jobs);
                }
                let dir = self.config.content_dir(dir.as_deref());
                tracing::debug!("Checking {}", dir.display());
                content_handlers::handle_check(options, &dir, out).await
            }
            Some(Command::List { dir, tag, category }) => {
                let dir = self.config.content_dir(dir.as_deref());
                let filter = ListFilter { tag, category };
                content_handlers::handle_list(self.config.loader_options(), &dir, &filter, out)
                    .await
            }
            Some(Command::Show { file }) => {
                content_handlers::handle_show(self.config.loader_options(), &file, out).await
            }
            Some(Command::Version) => {
                writeln!(out, "{} {}", self.name, self.version)?;
                Ok(Outcome::Success)
            }
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(
                    args.config.as_deref(),
                    config_cmd.command,
                    out,
                )?;
                Ok(Outcome::Success)
            }
            None => {
                writeln!(out, "{} {} - use --help for usage", self.name, self.version)?;
                Ok(Outcome::Success)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
