//! # Output Module
//!
//! This module centralizes all user-facing output for the licenser tool.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! ## Design Goals
//!
//! - **Informative**: Show actionable information without requiring flags
//! - **Scannable**: Use formatting to make output easy to parse visually
//! - **Progressive**: More detail with `-v`, silence with `-q`
//! - **Scriptable**: Keep stdout predictable for piping/automation

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::processor::Mode;
use crate::report::{FileReport, FileStatus, ProcessingSummary};

/// Symbols used in output
pub mod symbols {
  /// Valid header
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Missing or invalid header
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Header rewritten
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the initial "Checking N files..." or "Processing N files..." message.
pub fn print_start_message(file_count: usize, mode: Mode) {
  if is_quiet() {
    return;
  }

  let verb = match mode {
    Mode::Check => "Checking",
    Mode::Apply => "Processing",
  };
  let files_word = if file_count == 1 { "file" } else { "files" };

  println!("{} {} {}...", verb, file_count, files_word);
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print the list of files without a header comment.
pub fn print_missing_files(files: &[&FileReport], workspace_root: Option<&Path>) {
  let header = format!(
    "{} {} {} without a header:",
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
    files.len(),
    files_word(files.len())
  );
  print_failure_list(&header, files, workspace_root);
}

/// Print the list of files whose header matches no rule, with the reason
/// given by each rule.
pub fn print_invalid_files(files: &[&FileReport], workspace_root: Option<&Path>) {
  let header = format!(
    "{} {} {} with an invalid header:",
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
    files.len(),
    files_word(files.len())
  );
  print_failure_list(&header, files, workspace_root);
}

/// Print the list of files that could not be processed.
pub fn print_failed_files(files: &[&FileReport], workspace_root: Option<&Path>) {
  let header = format!(
    "{} {} {} could not be processed:",
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
    files.len(),
    files_word(files.len())
  );
  print_failure_list(&header, files, workspace_root);
}

/// Print the list of files whose header was rewritten.
pub fn print_updated_files(files: &[&FileReport], workspace_root: Option<&Path>) {
  if is_quiet() || files.is_empty() {
    return;
  }

  let count = files.len();
  println!(
    "{} Updated header of {} {}:",
    symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.yellow()),
    count,
    files_word(count)
  );

  let mut sorted_files = files.to_vec();
  sorted_files.sort_by(|a, b| a.path.cmp(&b.path));
  print_truncated(&sorted_files, workspace_root, false);
}

/// Print the success message when all files are fine.
pub fn print_all_files_ok(mode: Mode) {
  if is_quiet() {
    return;
  }

  let message = match mode {
    Mode::Check => "All files have valid license headers.",
    Mode::Apply => "All license headers are up to date.",
  };

  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

/// Print the processing summary.
///
/// Format: "Summary: X OK, Y missing, Z invalid, W skipped" when checking and
/// "Summary: X updated, Y unchanged, W skipped" when applying.
/// In verbose mode, also shows timing.
pub fn print_summary(summary: &ProcessingSummary, mode: Mode) {
  if is_quiet() {
    return;
  }

  let skipped_str = summary.skipped.if_supports_color(Stream::Stdout, |s| s.dimmed());

  let mut summary_line = match mode {
    Mode::Check => format!(
      "Summary: {} OK, {} missing, {} invalid, {} skipped",
      summary.valid.if_supports_color(Stream::Stdout, |s| s.cyan()),
      count_str(summary.missing),
      count_str(summary.invalid),
      skipped_str
    ),
    Mode::Apply => format!(
      "Summary: {} updated, {} unchanged, {} skipped",
      summary.updated.if_supports_color(Stream::Stdout, |s| s.yellow()),
      summary.unchanged.if_supports_color(Stream::Stdout, |s| s.cyan()),
      skipped_str
    ),
  };

  if summary.failed > 0 {
    summary_line.push_str(&format!(", {} failed", count_str(summary.failed)));
  }

  // Show timing in verbose mode
  if is_verbose() {
    summary_line.push_str(&format!(" ({:.2}s)", summary.processing_time.as_secs_f64()));
  }

  println!("{}", summary_line);
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

/// Categorize file reports into different groups for output.
pub struct CategorizedReports<'a> {
  pub missing: Vec<&'a FileReport>,
  pub invalid: Vec<&'a FileReport>,
  pub failed: Vec<&'a FileReport>,
  pub updated: Vec<&'a FileReport>,
  /// Valid or unchanged files
  pub ok: Vec<&'a FileReport>,
  pub skipped: Vec<&'a FileReport>,
}

impl<'a> CategorizedReports<'a> {
  /// Categorize a slice of file reports.
  pub fn from_reports(reports: &'a [FileReport]) -> Self {
    let mut categorized = Self {
      missing: Vec::new(),
      invalid: Vec::new(),
      failed: Vec::new(),
      updated: Vec::new(),
      ok: Vec::new(),
      skipped: Vec::new(),
    };

    for report in reports {
      match &report.status {
        FileStatus::Missing => categorized.missing.push(report),
        FileStatus::Invalid(_) => categorized.invalid.push(report),
        FileStatus::Failed(_) => categorized.failed.push(report),
        FileStatus::Updated => categorized.updated.push(report),
        FileStatus::Valid | FileStatus::Unchanged => categorized.ok.push(report),
        FileStatus::Skipped(_) => categorized.skipped.push(report),
      }
    }

    categorized
  }

  /// Whether any file makes the run fail.
  pub fn has_failures(&self) -> bool {
    !(self.missing.is_empty() && self.invalid.is_empty() && self.failed.is_empty())
  }
}

/// Prints failing files. In quiet mode only their paths are printed, for
/// scripting.
fn print_failure_list(header: &str, files: &[&FileReport], workspace_root: Option<&Path>) {
  if files.is_empty() {
    return;
  }

  let mut sorted_files = files.to_vec();
  sorted_files.sort_by(|a, b| a.path.cmp(&b.path));

  if is_quiet() {
    for file in &sorted_files {
      println!("{}", make_relative_path(&file.path, workspace_root));
    }
    return;
  }

  println!("{}", header);
  print_truncated(&sorted_files, workspace_root, true);
}

fn print_truncated(files: &[&FileReport], workspace_root: Option<&Path>, with_details: bool) {
  let count = files.len();
  let show_all = is_verbose();
  let limit = if show_all { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in files.iter().take(limit) {
    println!("  {}", make_relative_path(&file.path, workspace_root));

    if with_details {
      for detail in details(&file.status) {
        println!("      {}", detail.if_supports_color(Stream::Stdout, |s| s.dimmed()));
      }
    }
  }

  if !show_all && count > limit {
    let remaining = count - limit;
    println!(
      "  {} ... and {} more (use -v to see all)",
      "".if_supports_color(Stream::Stdout, |s| s.dimmed()),
      remaining
    );
  }
}

/// Explanation lines printed under a failing file.
fn details(status: &FileStatus) -> Vec<&str> {
  match status {
    FileStatus::Missing => vec!["Missing header comment."],
    FileStatus::Invalid(errors) => errors.iter().map(String::as_str).collect(),
    FileStatus::Failed(message) => vec![message.as_str()],
    _ => Vec::new(),
  }
}

fn count_str(count: usize) -> String {
  if count > 0 {
    count.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    count.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  }
}

const fn files_word(count: usize) -> &'static str {
  if count == 1 { "file" } else { "files" }
}

/// Make a path relative to the workspace root for display.
fn make_relative_path(path: &Path, workspace_root: Option<&Path>) -> String {
  if let Some(root) = workspace_root {
    path
      .strip_prefix(root)
      .map(|p| p.to_string_lossy().to_string())
      .unwrap_or_else(|_| path.to_string_lossy().to_string())
  } else {
    path.to_string_lossy().to_string()
  }
}
