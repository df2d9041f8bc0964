//! # licenser
//!
//! A tool that keeps license header comments consistent across a codebase.

use anyhow::Result;
use licenser::cli::{Cli, Command, run_apply, run_check};

fn main() -> Result<()> {
  let cli = Cli::parse_args();

  match cli.command {
    Command::Check(args) => run_check(args),
    Command::Apply(args) => run_apply(args),
  }
}
