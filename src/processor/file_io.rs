//! # File I/O Module
//!
//! This module provides file reading, writing and backup utilities for the
//! processor.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File I/O operations for the processor.
pub struct FileIO;

impl FileIO {
  /// Read full file content as UTF-8.
  pub fn read_full_content(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
  }

  /// Write file content.
  pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
  }

  /// Where `path` is backed up: its location relative to `workspace_root`,
  /// under `backup_dir`.
  ///
  /// Returns `None` for files outside of the workspace.
  pub fn backup_path(path: &Path, workspace_root: &Path, backup_dir: &Path) -> Option<PathBuf> {
    path
      .strip_prefix(workspace_root)
      .ok()
      .filter(|relative| !relative.as_os_str().is_empty())
      .map(|relative| backup_dir.join(relative))
  }

  /// Copies `path` into `backup_dir` before it gets rewritten.
  ///
  /// # Errors
  ///
  /// Fails when the file is outside of the workspace or cannot be copied, in
  /// which case the file must not be rewritten.
  pub fn backup_file(path: &Path, workspace_root: &Path, backup_dir: &Path) -> Result<PathBuf> {
    let backup = Self::backup_path(path, workspace_root, backup_dir)
      .with_context(|| format!("Cannot backup file {}, abandoning formatting", path.display()))?;

    if let Some(parent) = backup.parent() {
      std::fs::create_dir_all(parent).with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::copy(path, &backup)
      .with_context(|| format!("Cannot backup file {}, abandoning formatting", path.display()))?;

    Ok(backup)
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_backup_path() {
    assert_eq!(
      FileIO::backup_path(Path::new("/ws/src/Main.java"), Path::new("/ws"), Path::new("/ws/.backup")),
      Some(PathBuf::from("/ws/.backup/src/Main.java"))
    );
    assert_eq!(
      FileIO::backup_path(Path::new("/elsewhere/Main.java"), Path::new("/ws"), Path::new("/ws/.backup")),
      None
    );
  }

  #[test]
  fn test_backup_file() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let source_dir = temp_dir.path().join("src");
    std::fs::create_dir_all(&source_dir).expect("create dir");
    let file = source_dir.join("Main.java");
    FileIO::write_file(&file, "class Main {}\n").expect("write file");

    let backup_dir = temp_dir.path().join(".backup");
    let backup = FileIO::backup_file(&file, temp_dir.path(), &backup_dir).expect("backup should succeed");

    assert_eq!(backup, backup_dir.join("src").join("Main.java"));
    assert_eq!(FileIO::read_full_content(&backup).expect("read backup"), "class Main {}\n");
  }

  #[test]
  fn test_read_invalid_utf8() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let file = temp_dir.path().join("Binary.java");
    std::fs::write(&file, [0xff, 0xfe, 0x00]).expect("write file");

    let err = FileIO::read_full_content(&file).expect_err("invalid UTF-8 should fail");
    assert!(err.to_string().contains("Failed to read file"));
  }
}
