//! # File Collector Module
//!
//! This module turns user-provided patterns into the list of files to
//! process: plain files, directories walked recursively (honouring
//! `.gitignore`), and glob patterns. Exclusion globs are matched against
//! paths relative to the workspace root.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use ignore::WalkBuilder;
use tracing::{debug, trace};

/// File collector for pattern matching and directory traversal.
pub struct FileCollector {
  /// Root of the workspace
  workspace_root: PathBuf,
  /// Compiled exclusion globs
  excludes: Vec<Pattern>,
  /// Directories never descended into, such as the backup directory
  skipped_dirs: Vec<PathBuf>,
}

impl FileCollector {
  /// Creates a new FileCollector.
  ///
  /// # Errors
  ///
  /// Returns an error if an exclusion pattern is not a valid glob.
  pub fn new(workspace_root: PathBuf, exclude_patterns: &[String]) -> Result<Self> {
    let excludes = exclude_patterns
      .iter()
      .map(|pattern| Pattern::new(&pattern.replace('\\', "/")).with_context(|| format!("Invalid glob pattern: {pattern}")))
      .collect::<Result<Vec<_>>>()?;

    Ok(Self {
      workspace_root,
      excludes,
      skipped_dirs: Vec::new(),
    })
  }

  /// Never collects files below `dir`.
  #[must_use]
  pub fn skip_dir(mut self, dir: PathBuf) -> Self {
    self.skipped_dirs.push(dir);
    self
  }

  /// Collects every file matched by `patterns`, sorted and deduplicated.
  ///
  /// No pattern means the whole workspace.
  ///
  /// # Errors
  ///
  /// Returns an error if a pattern is neither an existing path nor a valid
  /// glob.
  pub fn collect(&self, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    if patterns.is_empty() {
      files.extend(self.traverse_directory(&self.workspace_root));
    }

    for pattern in patterns {
      let path = PathBuf::from(pattern);
      if path.is_file() {
        files.insert(path);
      } else if path.is_dir() {
        files.extend(self.traverse_directory(&path));
      } else {
        let entries = glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?;

        for entry in entries {
          match entry {
            Ok(path) if path.is_file() => {
              files.insert(path);
            }
            Ok(path) if path.is_dir() => files.extend(self.traverse_directory(&path)),
            Ok(_) => {}
            Err(e) => eprintln!("Error with glob pattern: {e}"),
          }
        }
      }
    }

    let files: Vec<PathBuf> = files.into_iter().filter(|path| !self.is_skipped(path)).collect();
    debug!("Collected {} files", files.len());
    Ok(files)
  }

  /// Walks `dir` recursively, skipping hidden and git-ignored entries.
  pub fn traverse_directory(&self, dir: &Path) -> Vec<PathBuf> {
    debug!("Scanning directory: {}", dir.display());
    let start_time = std::time::Instant::now();

    let mut files = Vec::new();
    let walker = WalkBuilder::new(dir)
      .hidden(true)
      .git_ignore(true)
      .git_exclude(true)
      .require_git(false)
      .build();

    for entry in walker {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
          eprintln!("Error reading directory {}: {}", dir.display(), e);
          continue;
        }
      };

      if entry.file_type().is_some_and(|file_type| file_type.is_file()) {
        files.push(entry.into_path());
      }
    }

    debug!(
      "Found {} files in {}ms",
      files.len(),
      start_time.elapsed().as_millis()
    );

    files
  }

  /// Whether `path` matches an exclusion glob.
  pub fn is_excluded(&self, path: &Path) -> bool {
    if self.excludes.is_empty() {
      return false;
    }

    let absolute = absolutize_path(path).unwrap_or_else(|_| path.to_path_buf());
    let relative = normalize_relative_path(&absolute, &self.workspace_root);
    let relative = relative.to_string_lossy().replace('\\', "/");

    let excluded = self.excludes.iter().any(|pattern| pattern.matches(&relative));
    if excluded {
      trace!("Excluded: {}", relative);
    }
    excluded
  }

  fn is_skipped(&self, path: &Path) -> bool {
    if self.skipped_dirs.is_empty() {
      return false;
    }

    let absolute = absolutize_path(path).unwrap_or_else(|_| path.to_path_buf());
    self.skipped_dirs.iter().any(|dir| absolute.starts_with(dir))
  }
}

/// Converts a potentially relative path to an absolute path.
pub fn absolutize_path(path: &Path) -> Result<PathBuf> {
  if path.is_absolute() {
    Ok(path.to_path_buf())
  } else {
    let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;
    Ok(current_dir.join(path))
  }
}

/// Normalizes a path to be relative to a given directory.
pub fn normalize_relative_path(path: &Path, base_dir: &Path) -> PathBuf {
  if path.is_absolute() {
    if let Ok(stripped) = path.strip_prefix(base_dir) {
      return stripped.to_path_buf();
    }

    if let Some(rel_path) = pathdiff::diff_paths(path, base_dir) {
      return rel_path;
    }
  }

  let mut normalized = PathBuf::new();
  for component in path.components() {
    if matches!(component, std::path::Component::CurDir) {
      continue;
    }
    normalized.push(component.as_os_str());
  }

  if normalized.as_os_str().is_empty() {
    PathBuf::from(".")
  } else {
    normalized
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;

  fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).expect("create dirs");
    }
    fs::write(&path, "content\n").expect("write file");
    path
  }

  #[test]
  fn test_collect_directory() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    let main = touch(root, "src/Main.java");
    let util = touch(root, "src/util/Util.java");
    touch(root, ".hidden/Secret.java");

    let collector = FileCollector::new(root.to_path_buf(), &[]).expect("collector");
    let files = collector
      .collect(&[root.join("src").to_string_lossy().into_owned()])
      .expect("collect");

    assert_eq!(files, vec![main, util]);
  }

  #[test]
  fn test_collect_honours_gitignore() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    fs::write(root.join(".gitignore"), "build/\n").expect("write gitignore");
    let main = touch(root, "Main.java");
    touch(root, "build/Generated.java");

    let collector = FileCollector::new(root.to_path_buf(), &[]).expect("collector");
    assert_eq!(collector.collect(&[]).expect("collect"), vec![main]);
  }

  #[test]
  fn test_collect_glob_and_dedup() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    let main = touch(root, "src/Main.java");
    touch(root, "src/page.html");

    let collector = FileCollector::new(root.to_path_buf(), &[]).expect("collector");
    let files = collector
      .collect(&[
        format!("{}/src/*.java", root.display()),
        main.to_string_lossy().into_owned(),
      ])
      .expect("collect");

    assert_eq!(files, vec![main]);
  }

  #[test]
  fn test_invalid_glob() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let collector = FileCollector::new(temp_dir.path().to_path_buf(), &[]).expect("collector");
    assert!(collector.collect(&["src/[".to_string()]).is_err());
    assert!(FileCollector::new(temp_dir.path().to_path_buf(), &["a/[".to_string()]).is_err());
  }

  #[test]
  fn test_is_excluded() {
    let root = PathBuf::from("/workspace");
    let collector = FileCollector::new(root.clone(), &["**/generated/**".to_string(), "*.min.js".to_string()])
      .expect("collector");

    assert!(collector.is_excluded(&root.join("src/generated/Model.java")));
    assert!(collector.is_excluded(&root.join("web/app.min.js")));
    assert!(!collector.is_excluded(&root.join("src/Main.java")));
  }

  #[test]
  fn test_skipped_dirs() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    let main = touch(root, "Main.java");
    touch(root, "backup/Main.java");

    let collector = FileCollector::new(root.to_path_buf(), &[])
      .expect("collector")
      .skip_dir(root.join("backup"));
    assert_eq!(collector.collect(&[]).expect("collect"), vec![main]);
  }

  #[test]
  fn test_normalize_relative_path() {
    assert_eq!(
      normalize_relative_path(Path::new("/ws/src/Main.java"), Path::new("/ws")),
      PathBuf::from("src/Main.java")
    );
    assert_eq!(
      normalize_relative_path(Path::new("./src/./Main.java"), Path::new("/ws")),
      PathBuf::from("src/Main.java")
    );
    assert_eq!(normalize_relative_path(Path::new("."), Path::new("/ws")), PathBuf::from("."));
  }
}
