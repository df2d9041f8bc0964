//! # Report Module
//!
//! This module records the outcome of every processed file and can write it
//! out as a JSON report for CI pipelines.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// What happened to a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "details", rename_all = "snake_case")]
pub enum FileStatus {
  /// The header matches one of the rules.
  Valid,
  /// No header comment was found.
  Missing,
  /// The header matches no rule; one message per rule.
  Invalid(Vec<String>),
  /// The header was rewritten (or would be, when checking with a diff).
  Updated,
  /// The header was already up to date.
  Unchanged,
  /// The file was not looked at.
  Skipped(String),
  /// The file could not be processed.
  Failed(String),
}

/// Information about a processed file for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
  /// Path to the file
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  #[serde(flatten)]
  pub status: FileStatus,
}

impl FileReport {
  pub fn new(path: impl Into<PathBuf>, status: FileStatus) -> Self {
    Self {
      path: path.into(),
      status,
    }
  }

  /// Whether this file makes a run fail.
  pub const fn is_failure(&self) -> bool {
    matches!(
      self.status,
      FileStatus::Missing | FileStatus::Invalid(_) | FileStatus::Failed(_)
    )
  }
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Summary of the processing results
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSummary {
  /// Total number of files seen, skipped ones included
  pub total_files: usize,
  pub valid: usize,
  pub missing: usize,
  pub invalid: usize,
  pub updated: usize,
  pub unchanged: usize,
  pub skipped: usize,
  pub failed: usize,
  /// Total processing time
  #[serde(skip_serializing)]
  pub processing_time: Duration,
  /// Processing time in seconds for serialization
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
  /// Timestamp when the report was generated
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timestamp: Option<i64>,
}

impl ProcessingSummary {
  /// Create a new ProcessingSummary initialized to zero
  pub fn new(processing_time: Duration) -> Self {
    Self {
      total_files: 0,
      valid: 0,
      missing: 0,
      invalid: 0,
      updated: 0,
      unchanged: 0,
      skipped: 0,
      failed: 0,
      processing_time,
      processing_time_secs: processing_time.as_secs_f64(),
      timestamp: Some(Local::now().timestamp()),
    }
  }

  /// Create a ProcessingSummary from a collection of FileReports
  pub fn from_reports(files: &[FileReport], processing_time: Duration) -> Self {
    let mut summary = Self::new(processing_time);
    summary.total_files = files.len();

    for file in files {
      match file.status {
        FileStatus::Valid => summary.valid += 1,
        FileStatus::Missing => summary.missing += 1,
        FileStatus::Invalid(_) => summary.invalid += 1,
        FileStatus::Updated => summary.updated += 1,
        FileStatus::Unchanged => summary.unchanged += 1,
        FileStatus::Skipped(_) => summary.skipped += 1,
        FileStatus::Failed(_) => summary.failed += 1,
      }
    }

    summary
  }

  /// Whether any file makes the run fail.
  pub const fn has_failures(&self) -> bool {
    self.missing + self.invalid + self.failed > 0
  }
}

#[derive(Serialize)]
struct JsonReport<'a> {
  summary: &'a ProcessingSummary,
  files: &'a [FileReport],
}

/// Writes JSON reports.
pub struct ReportGenerator<'a> {
  /// Path where the report will be saved
  output_path: &'a Path,
}

impl<'a> ReportGenerator<'a> {
  pub const fn new(output_path: &'a Path) -> Self {
    Self { output_path }
  }

  /// Writes `files` and `summary` to the output path, pretty-printed.
  pub fn generate(&self, files: &[FileReport], summary: &ProcessingSummary) -> Result<()> {
    let content = Self::render(files, summary)?;

    fs::write(self.output_path, content)
      .with_context(|| format!("Failed to write report to {}", self.output_path.display()))
  }

  fn render(files: &[FileReport], summary: &ProcessingSummary) -> Result<String> {
    let mut files = files.to_vec();
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let report = JsonReport { summary, files: &files };
    serde_json::to_string_pretty(&report).with_context(|| "Failed to serialize report")
  }
}
