//! Folio CLI
//!
//! Command-line interface for loading and checking blog content.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use folio_cli::{CliArgs, FolioCli};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = CliArgs::parse();
    let cli = FolioCli::from_args("folio", &args)?;
    let outcome = cli.run(args).await?;
    Ok(outcome.exit_code())
}
