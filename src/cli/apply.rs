//! # Apply Command
//!
//! This module implements the `apply` command: missing headers are added and
//! headers that are invalid or outdated are rewritten from the first matching
//! rule, or from the default rule.

use std::process;

use anyhow::Result;
use clap::Args;

use super::common::{CommonArgs, RunOptions, run};
use crate::processor::Mode;

/// Arguments for the apply command
#[derive(Args, Debug, Default)]
pub struct ApplyArgs {
  #[command(flatten)]
  pub common: CommonArgs,

  /// Do not copy files to the backup directory before rewriting them
  #[arg(long)]
  pub no_backup: bool,
}

/// Run the apply command with the given arguments
///
/// Exits with status 1 when a file could not be updated.
pub fn run_apply(args: ApplyArgs) -> Result<()> {
  args.common.init_output();

  let summary = run(
    args.common,
    RunOptions {
      mode: Mode::Apply,
      show_diff: false,
      backup: !args.no_backup,
    },
  )?;

  if summary.failed > 0 {
    process::exit(1);
  }

  Ok(())
}
