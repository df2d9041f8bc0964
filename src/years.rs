//! # Years Module
//!
//! Computes the [`HeaderFileContext`] of a file for a given rule.
//!
//! A rule's [`YearSelectionMode`] decides where years come from:
//! - `project`: the creation year is the project's (configured, else the year
//!   of the first commit) and the last modification year is the latest change
//!   anywhere in the workspace.
//! - `file`: both years are tracked per file, the creation year coming from the
//!   file system.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Local};
use tracing::debug;

use crate::rule::{HeaderFileContext, YearSelectionMode};

/// The current year in the local time zone.
pub fn current_year() -> i32 {
  Local::now().year()
}

/// Source of last modification years, usually version control history.
pub trait ModificationYearProvider: Send + Sync {
  /// Year `path` was last modified. `path` may be the workspace `root` itself,
  /// in which case the latest change anywhere in the workspace counts.
  fn modification_year(&self, root: &Path, path: &Path) -> i32;

  /// Year the project started, if history knows it.
  fn first_commit_year(&self, _root: &Path) -> Option<i32> {
    None
  }
}

/// A provider answering the same year for every path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedYear(pub i32);

impl ModificationYearProvider for FixedYear {
  fn modification_year(&self, _root: &Path, _path: &Path) -> i32 {
    self.0
  }
}

/// Builds file contexts, caching project-wide years.
pub struct YearResolver {
  root: PathBuf,
  history: Arc<dyn ModificationYearProvider>,
  project_creation_year: Option<i32>,
  year_override: Option<i32>,
  project_years: OnceLock<(i32, i32)>,
}

impl YearResolver {
  pub fn new(root: PathBuf, history: Arc<dyn ModificationYearProvider>) -> Self {
    Self {
      root,
      history,
      project_creation_year: None,
      year_override: None,
      project_years: OnceLock::new(),
    }
  }

  /// Pins the creation year of `project` mode rules.
  #[must_use]
  pub fn with_project_creation_year(mut self, year: Option<i32>) -> Self {
    self.project_creation_year = year;
    self
  }

  /// Pins the last modification year of every file.
  #[must_use]
  pub fn with_year_override(mut self, year: Option<i32>) -> Self {
    self.year_override = year;
    self
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// The context to render `path` with under `mode`.
  ///
  /// # Errors
  ///
  /// Returns an error if `file` mode needs metadata of a file that cannot be
  /// read.
  pub fn context_for(&self, mode: YearSelectionMode, path: &Path) -> Result<HeaderFileContext> {
    let file_name = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_default();

    let (creation_year, last_modified_year) = match mode {
      YearSelectionMode::Project => *self.project_years.get_or_init(|| self.project_years()),
      YearSelectionMode::File => {
        let metadata = fs::metadata(path).with_context(|| format!("Failed to read metadata of {}", path.display()))?;
        let created = metadata.created().or_else(|_| metadata.modified()).ok();
        let creation_year = created.map_or_else(current_year, system_time_year);

        let last_modified_year = self
          .year_override
          .unwrap_or_else(|| self.history.modification_year(&self.root, path));
        (creation_year, last_modified_year)
      }
    };

    Ok(HeaderFileContext::new(file_name, creation_year, last_modified_year))
  }

  fn project_years(&self) -> (i32, i32) {
    let creation_year = self
      .project_creation_year
      .or_else(|| self.history.first_commit_year(&self.root))
      .unwrap_or_else(current_year);
    let last_modified_year = self
      .year_override
      .unwrap_or_else(|| self.history.modification_year(&self.root, &self.root));

    debug!(
      "Project years for {}: created {}, last modified {}",
      self.root.display(),
      creation_year,
      last_modified_year
    );

    (creation_year, last_modified_year)
  }
}

fn system_time_year(time: SystemTime) -> i32 {
  DateTime::<Local>::from(time).year()
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use tempfile::TempDir;

  use super::*;

  #[derive(Default)]
  struct CountingHistory {
    calls: AtomicUsize,
  }

  impl ModificationYearProvider for CountingHistory {
    fn modification_year(&self, root: &Path, path: &Path) -> i32 {
      self.calls.fetch_add(1, Ordering::SeqCst);
      if root == path { 2024 } else { 2022 }
    }

    fn first_commit_year(&self, _root: &Path) -> Option<i32> {
      Some(2015)
    }
  }

  fn write_file(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, "class Main {}\n").expect("write file");
    path
  }

  #[test]
  fn test_project_mode_uses_workspace_years() {
    let dir = TempDir::new().expect("create temp dir");
    let path = write_file(&dir, "Main.java");
    let history = Arc::new(CountingHistory::default());
    let resolver = YearResolver::new(dir.path().to_path_buf(), history.clone());

    let context = resolver
      .context_for(YearSelectionMode::Project, &path)
      .expect("context should resolve");
    assert_eq!(context, HeaderFileContext::new("Main.java", 2015, 2024));

    // Project years are only computed once
    resolver
      .context_for(YearSelectionMode::Project, &path)
      .expect("context should resolve");
    assert_eq!(history.calls.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn test_configured_project_creation_year_wins() {
    let dir = TempDir::new().expect("create temp dir");
    let path = write_file(&dir, "Main.java");
    let resolver = YearResolver::new(dir.path().to_path_buf(), Arc::new(CountingHistory::default()))
      .with_project_creation_year(Some(2010));

    let context = resolver
      .context_for(YearSelectionMode::Project, &path)
      .expect("context should resolve");
    assert_eq!(context.creation_year, 2010);
  }

  #[test]
  fn test_file_mode_uses_file_years() {
    let dir = TempDir::new().expect("create temp dir");
    let path = write_file(&dir, "Main.java");
    let resolver = YearResolver::new(dir.path().to_path_buf(), Arc::new(CountingHistory::default()));

    let context = resolver
      .context_for(YearSelectionMode::File, &path)
      .expect("context should resolve");
    assert_eq!(context.file_name, "Main.java");
    // Freshly written file
    assert_eq!(context.creation_year, current_year());
    assert_eq!(context.last_modified_year, 2022);
  }

  #[test]
  fn test_year_override() {
    let dir = TempDir::new().expect("create temp dir");
    let path = write_file(&dir, "Main.java");
    let resolver = YearResolver::new(dir.path().to_path_buf(), Arc::new(FixedYear(2000))).with_year_override(Some(2030));

    let project = resolver
      .context_for(YearSelectionMode::Project, &path)
      .expect("context should resolve");
    assert_eq!(project.last_modified_year, 2030);
    assert_eq!(project.creation_year, current_year());

    let file = resolver
      .context_for(YearSelectionMode::File, &path)
      .expect("context should resolve");
    assert_eq!(file.last_modified_year, 2030);
  }

  #[test]
  fn test_file_mode_missing_file() {
    let dir = TempDir::new().expect("create temp dir");
    let resolver = YearResolver::new(dir.path().to_path_buf(), Arc::new(FixedYear(2020)));

    assert!(
      resolver
        .context_for(YearSelectionMode::File, &dir.path().join("Missing.java"))
        .is_err()
    );
  }
}
