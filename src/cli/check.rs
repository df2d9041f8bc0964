//! # Check Command
//!
//! This module implements the `check` command: every file must carry a
//! header comment matching one of the rules. Nothing is written.

use std::process;

use anyhow::Result;
use clap::Args;

use super::common::{CommonArgs, RunOptions, run};
use crate::processor::Mode;

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
  #[command(flatten)]
  pub common: CommonArgs,

  /// Show the changes `apply` would make
  #[arg(long)]
  pub show_diff: bool,
}

/// Run the check command with the given arguments
///
/// Exits with status 1 when a header is missing or invalid, or a file could
/// not be read.
pub fn run_check(args: CheckArgs) -> Result<()> {
  args.common.init_output();

  let summary = run(
    args.common,
    RunOptions {
      mode: Mode::Check,
      show_diff: args.show_diff,
      backup: false,
    },
  )?;

  if summary.has_failures() {
    process::exit(1);
  }

  Ok(())
}
