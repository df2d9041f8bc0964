//! # Configuration Module
//!
//! This module provides configuration support for licenser: which header
//! templates a project accepts, how its years are computed, which files are
//! left alone and which comment style each file extension uses.
//!
//! Configuration can be specified in a `.licenser.toml` file or via the
//! `LICENSER_CONFIG` environment variable.
//!
//! ```toml
//! rules = ["codeformat/HEADER", "codeformat/HEADER_OLD"]
//! project-creation-year = 2021
//! exclude = ["**/generated/**"]
//! backup-dir = "build/licenser-backup"
//!
//! [comment-styles]
//! block = ["rs"]
//! markup = ["vue"]
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::comment::{BlockComment, CommentRegistry, MarkupComment};
use crate::license_header::LicenseHeader;
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".licenser.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "LICENSER_CONFIG";

/// Extra file extensions per comment style.
///
/// Extensions listed here take precedence over the builtin ones.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
pub struct CommentStylesConfig {
  /// Extensions using `/* */` block comments.
  #[serde(default)]
  pub block: Vec<String>,

  /// Extensions using `<!-- -->` markup comments.
  #[serde(default)]
  pub markup: Vec<String>,
}

/// Main configuration struct for licenser.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
  /// Header template files, relative to the config file. The first one is
  /// the default rule.
  #[serde(default)]
  pub rules: Vec<PathBuf>,

  /// Creation year used by `project` mode rules.
  #[serde(default)]
  pub project_creation_year: Option<i32>,

  /// Glob patterns of files to leave alone.
  #[serde(default)]
  pub exclude: Vec<String>,

  /// Where original files are copied before being rewritten.
  #[serde(default)]
  pub backup_dir: Option<PathBuf>,

  #[serde(default, rename = "comment-styles")]
  pub comment_styles: CommentStylesConfig,

  /// Directory relative paths are resolved against.
  #[serde(skip)]
  pub base_dir: PathBuf,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A comment style extension is malformed.
  #[error("Invalid extension '{extension}': {message}")]
  InvalidExtension { extension: String, message: String },

  /// An extension is claimed by more than one comment style.
  #[error("Extension '{extension}' is listed under more than one comment style")]
  DuplicateExtension { extension: String },
}

impl Config {
  /// Load configuration from a file.
  ///
  /// Relative paths in the file are resolved against the file's directory.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let config = config.normalize();

    verbose_log!(
      "Loaded {} rules and {} comment style overrides",
      config.rules.len(),
      config.comment_styles.block.len() + config.comment_styles.markup.len()
    );

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - Extension names don't include the leading dot
  /// - No extension is listed under two comment styles
  fn validate(&self) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for ext in self.comment_styles.block.iter().chain(&self.comment_styles.markup) {
      if ext.starts_with('.') {
        return Err(ConfigError::InvalidExtension {
          extension: ext.clone(),
          message: "extension should not include leading dot".to_string(),
        });
      }

      if ext.trim().is_empty() {
        return Err(ConfigError::InvalidExtension {
          extension: ext.clone(),
          message: "extension cannot be empty".to_string(),
        });
      }

      if !seen.insert(ext.to_lowercase()) {
        return Err(ConfigError::DuplicateExtension {
          extension: ext.clone(),
        });
      }
    }

    Ok(())
  }

  /// Normalize extensions to lowercase for case-insensitive matching.
  fn normalize(mut self) -> Self {
    let lowercase = |extensions: Vec<String>| extensions.into_iter().map(|ext| ext.to_lowercase()).collect();

    self.comment_styles = CommentStylesConfig {
      block: lowercase(self.comment_styles.block),
      markup: lowercase(self.comment_styles.markup),
    };
    self
  }

  /// Template paths, resolved against the config file's directory.
  pub fn rule_paths(&self) -> Vec<PathBuf> {
    self.rules.iter().map(|rule| self.resolve(rule)).collect()
  }

  /// Backup directory, resolved against the config file's directory.
  pub fn backup_dir(&self) -> Option<PathBuf> {
    self.backup_dir.as_deref().map(|dir| self.resolve(dir))
  }

  /// The comment registry with configured extensions ahead of the builtin
  /// ones.
  pub fn comment_registry(&self) -> CommentRegistry {
    let mut registry = CommentRegistry::new();
    registry.register(&self.comment_styles.block, Arc::new(BlockComment));
    registry.register(&self.comment_styles.markup, Arc::new(MarkupComment));
    registry.with_builtin_defaults()
  }

  fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.base_dir.join(path)
    }
  }
}

/// Loads every template file into a [`LicenseHeader`], in order.
///
/// Each rule is named after its file.
///
/// # Errors
///
/// Returns an error if no template is given, a file cannot be read or a
/// template is invalid.
pub fn load_license_header(paths: &[PathBuf]) -> Result<LicenseHeader> {
  let mut builder = LicenseHeader::builder();

  for path in paths {
    let template =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read header template {}", path.display()))?;
    let name = path
      .file_stem()
      .map(|stem| stem.to_string_lossy().into_owned())
      .unwrap_or_else(|| path.display().to_string());

    verbose_log!("Loading header rule '{}' from {}", name, path.display());
    builder = builder
      .template(name, &template)
      .with_context(|| format!("Invalid header template {}", path.display()))?;
  }

  Ok(builder.build()?)
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `LICENSER_CONFIG` environment variable
/// 3. `.licenser.toml` in the workspace root
pub fn discover_config_path(explicit_path: Option<&Path>, workspace_root: &Path) -> Option<PathBuf> {
  // 1. Explicit path from CLI takes highest priority
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  // 2. Check environment variable
  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  // 3. Check workspace root
  let workspace_config = workspace_root.join(DEFAULT_CONFIG_FILENAME);
  if workspace_config.exists() {
    verbose_log!("Using workspace config: {}", workspace_config.display());
    return Some(workspace_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path.
///
/// Returns `Ok(None)` when `no_config` is set or no config file exists.
pub fn load_config(explicit_path: Option<&Path>, workspace_root: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  match discover_config_path(explicit_path, workspace_root) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}
