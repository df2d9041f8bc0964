#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use assert_cmd::Command;

/// A header whose only variable is the creation year.
pub const HEADER: &str = "Copyright ${CREATION_YEAR} Yumi Project\n";

/// The older header style some files still carry.
pub const HEADER_OLD: &str = "Copyright ${CREATION_YEAR} Yumi\n\nLicensed under the MPL.\n";

/// Writes `content` to `relative` below `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> Result<PathBuf> {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(path)
}

/// A licenser `subcommand` invocation, isolated from the caller's environment.
pub fn licenser(current_dir: &Path, subcommand: &str) -> Result<Command> {
  let mut command = Command::cargo_bin("licenser")?;
  command
    .current_dir(current_dir)
    .env_remove("LICENSER_CONFIG")
    .env_remove("RUST_LOG")
    .args([subcommand, "--colors=never"]);
  Ok(command)
}
