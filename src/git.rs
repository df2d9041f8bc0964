//! # Git Module
//!
//! Reads copyright years out of git history.
//!
//! A path is considered modified this year when its working tree or index
//! state differs from `HEAD`. Otherwise its last modification year is the
//! author year of the latest commit that touched it, in the author's own time
//! zone. Whenever history cannot tell (no repository, no commits, broken
//! objects), the current year is used.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, FixedOffset, TimeZone};
use git2::{Commit, ErrorCode, Oid, Repository, Sort, Status, StatusOptions};
use tracing::{debug, trace};

use crate::years::{ModificationYearProvider, current_year};

/// [`ModificationYearProvider`] backed by the git repository enclosing the
/// workspace.
///
/// Repositories are opened per lookup, so the provider is freely shared
/// between worker threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitHistory;

impl ModificationYearProvider for GitHistory {
  fn modification_year(&self, root: &Path, path: &Path) -> i32 {
    match last_change_year(root, path) {
      Ok(Some(year)) => year,
      Ok(None) => current_year(),
      Err(e) => {
        trace!("No git history for {}: {:#}", path.display(), e);
        current_year()
      }
    }
  }

  fn first_commit_year(&self, root: &Path) -> Option<i32> {
    match first_commit_year(root) {
      Ok(year) => year,
      Err(e) => {
        trace!("No first commit for {}: {:#}", root.display(), e);
        None
      }
    }
  }
}

/// Finds the working directory of the repository containing `start`.
///
/// Returns `Ok(None)` when `start` is not inside a non-bare repository.
pub fn discover_repo_root(start: &Path) -> Result<Option<PathBuf>> {
  let repo = match Repository::discover(start) {
    Ok(repo) => repo,
    Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
    Err(e) => {
      return Err(e).with_context(|| format!("Failed to open git repository at {}", start.display()));
    }
  };

  let root = repo.workdir().map(Path::to_path_buf);
  if let Some(ref root) = root {
    debug!("Found git repository at {}", root.display());
  }

  Ok(root)
}

/// Author year of the oldest commit reachable from `HEAD`.
pub fn first_commit_year(root: &Path) -> Result<Option<i32>> {
  let repo = Repository::discover(root).with_context(|| format!("Failed to open git repository at {}", root.display()))?;

  let mut revwalk = repo.revwalk().with_context(|| "Failed to walk git history")?;
  revwalk.push_head().with_context(|| "Failed to read HEAD")?;
  revwalk
    .set_sorting(Sort::TIME | Sort::REVERSE)
    .with_context(|| "Failed to sort git history")?;

  let Some(oid) = revwalk.next() else {
    return Ok(None);
  };

  let commit = repo.find_commit(oid?).with_context(|| "Failed to read first commit")?;
  Ok(Some(author_year(&commit)))
}

/// Year of the last committed change to `path`, or `None` when `path` has
/// uncommitted changes or was never committed.
fn last_change_year(root: &Path, path: &Path) -> Result<Option<i32>> {
  let repo = Repository::discover(root).with_context(|| format!("Failed to open git repository at {}", root.display()))?;
  let workdir = repo
    .workdir()
    .with_context(|| "Bare repositories have no working tree")?
    .canonicalize()
    .with_context(|| "Failed to resolve repository root")?;

  let path = path
    .canonicalize()
    .with_context(|| format!("Failed to resolve {}", path.display()))?;
  let relative = path
    .strip_prefix(&workdir)
    .with_context(|| format!("{} is outside of {}", path.display(), workdir.display()))?;

  if relative.as_os_str().is_empty() {
    return workspace_change_year(&repo);
  }

  let status = repo
    .status_file(relative)
    .with_context(|| format!("Failed to read git status of {}", relative.display()))?;
  if status != Status::CURRENT {
    trace!("{} has uncommitted changes ({:?})", relative.display(), status);
    return Ok(None);
  }

  let mut revwalk = repo.revwalk()?;
  revwalk.push_head()?;
  revwalk.set_sorting(Sort::TIME)?;

  for oid in revwalk {
    let commit = repo.find_commit(oid?)?;
    if touches(&commit, relative)? {
      return Ok(Some(author_year(&commit)));
    }
  }

  Ok(None)
}

/// Year of the last commit, or `None` when the working tree is dirty.
fn workspace_change_year(repo: &Repository) -> Result<Option<i32>> {
  let mut options = StatusOptions::new();
  options.include_untracked(true).include_ignored(false);

  let statuses = repo.statuses(Some(&mut options)).with_context(|| "Failed to get git status")?;
  if statuses.iter().any(|entry| entry.status() != Status::CURRENT) {
    trace!("Working tree has uncommitted changes");
    return Ok(None);
  }

  let head = repo.head()?.peel_to_commit().with_context(|| "Failed to get HEAD commit")?;
  Ok(Some(author_year(&head)))
}

/// Whether `commit` changed `path` compared to every one of its parents.
fn touches(commit: &Commit<'_>, path: &Path) -> Result<bool> {
  let entry = entry_id(commit, path)?;

  if commit.parent_count() == 0 {
    return Ok(entry.is_some());
  }

  for parent in commit.parents() {
    if entry_id(&parent, path)? == entry {
      return Ok(false);
    }
  }

  Ok(true)
}

fn entry_id(commit: &Commit<'_>, path: &Path) -> Result<Option<Oid>> {
  let tree = commit.tree()?;
  match tree.get_path(path) {
    Ok(entry) => Ok(Some(entry.id())),
    Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
    Err(e) => Err(e.into()),
  }
}

/// The author year of `commit`, in the author's time zone.
fn author_year(commit: &Commit<'_>) -> i32 {
  let when = commit.author().when();

  FixedOffset::east_opt(when.offset_minutes() * 60)
    .and_then(|offset| offset.timestamp_opt(when.seconds(), 0).single())
    .map_or_else(current_year, |time| time.year())
}
