//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing, with one subcommand per operation:
//! `check` validates headers and `apply` rewrites them.

mod apply;
mod check;
mod common;

pub use apply::{ApplyArgs, run_apply};
pub use check::{CheckArgs, run_check};
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Parser, Subcommand};
pub use common::CommonArgs;

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Check headers against the rules listed in .licenser.toml
  licenser check

  # Check a directory against a single header template
  licenser check --rule codeformat/HEADER src/

  # Show what apply would change
  licenser check --show-diff src/

  # Add missing headers and refresh outdated ones
  licenser apply --rule codeformat/HEADER --rule codeformat/HEADER_OLD src/

  # Pin the last modification year and skip generated code
  licenser apply --year 2024 --exclude \"**/generated/**\" .

  # Write a JSON report for CI
  licenser check --report-json licenser-report.json .
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Check that every file has a header matching one of the rules
  Check(CheckArgs),
  /// Add missing headers and update outdated ones
  Apply(ApplyArgs),
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_definition() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_parse_check() {
    let cli = Cli::try_parse_from([
      "licenser",
      "check",
      "--rule",
      "HEADER",
      "--rule",
      "HEADER_OLD",
      "--show-diff",
      "-vv",
      "src",
    ])
    .expect("arguments should parse");

    let Command::Check(args) = cli.command else {
      panic!("expected the check command");
    };
    assert!(args.show_diff);
    assert_eq!(args.common.rule, vec![PathBuf::from("HEADER"), PathBuf::from("HEADER_OLD")]);
    assert_eq!(args.common.verbose, 2);
    assert_eq!(args.common.patterns, vec!["src".to_string()]);
  }

  #[test]
  fn test_parse_apply() {
    let cli = Cli::try_parse_from(["licenser", "apply", "--no-backup", "--year", "2024", "--exclude", "*.min.js"])
      .expect("arguments should parse");

    let Command::Apply(args) = cli.command else {
      panic!("expected the apply command");
    };
    assert!(args.no_backup);
    assert_eq!(args.common.year, Some(2024));
    assert_eq!(args.common.exclude, vec!["*.min.js".to_string()]);
    assert_eq!(args.common.patterns, vec![".".to_string()]);
  }

  #[test]
  fn test_quiet_conflicts_with_verbose() {
    assert!(Cli::try_parse_from(["licenser", "check", "-q", "-v"]).is_err());
  }

  #[test]
  fn test_show_diff_is_check_only() {
    assert!(Cli::try_parse_from(["licenser", "apply", "--show-diff"]).is_err());
  }
}
