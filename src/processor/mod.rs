//! # Processor Module
//!
//! This module applies a [`LicenseHeader`] to files: checking that their
//! header comment matches one of the rules, or rewriting it.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - File reading, writing and backups
//! - [`content_transformer`] - Splicing a new header comment into a file
//! - [`file_collector`] - File collection, pattern matching, and directory traversal
//!
//! The [`Processor`] struct is the main entry point for all file operations,
//! orchestrating the submodules to provide a cohesive API.

mod content_transformer;
mod file_collector;
mod file_io;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
pub use content_transformer::ContentTransformer;
pub use file_collector::{FileCollector, absolutize_path, normalize_relative_path};
pub use file_io::FileIO;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::comment::{CommentBlock, CommentRegistry, HeaderComment};
use crate::diff::DiffManager;
use crate::info_log;
use crate::license_header::LicenseHeader;
use crate::report::{FileReport, FileStatus};
use crate::years::YearResolver;

/// What the processor does with each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Report files whose header matches no rule.
  Check,
  /// Rewrite headers that are missing, invalid or outdated.
  Apply,
}

/// Configuration for creating a Processor instance.
pub struct ProcessorConfig {
  pub header: Arc<LicenseHeader>,
  pub registry: CommentRegistry,
  pub years: Arc<YearResolver>,
  pub workspace_root: PathBuf,
  pub mode: Mode,

  // Optional components
  pub exclude_patterns: Vec<String>,
  pub backup_dir: Option<PathBuf>,
  pub diff_manager: Option<DiffManager>,
}

impl ProcessorConfig {
  /// Creates a new ProcessorConfig with required fields and sensible defaults.
  ///
  /// The workspace root is the year resolver's root. Use struct update syntax
  /// to override specific fields:
  /// ```ignore
  /// ProcessorConfig {
  ///     backup_dir: Some(root.join(".licenser-backup")),
  ///     ..ProcessorConfig::new(header, years, Mode::Apply)
  /// }
  /// ```
  pub fn new(header: Arc<LicenseHeader>, years: Arc<YearResolver>, mode: Mode) -> Self {
    let workspace_root = years.root().to_path_buf();
    Self {
      header,
      registry: CommentRegistry::builtin(),
      years,
      workspace_root,
      mode,
      exclude_patterns: vec![],
      backup_dir: None,
      diff_manager: None,
    }
  }
}

/// Processor for checking and applying license headers.
///
/// Files are processed in parallel batches; one [`FileReport`] is collected
/// for every file seen, skipped ones included.
pub struct Processor {
  /// Root of the current workspace.
  workspace_root: PathBuf,

  /// Accepted header rules
  header: Arc<LicenseHeader>,

  /// Comment strategy per file extension
  registry: CommentRegistry,

  /// Source of header years
  years: Arc<YearResolver>,

  mode: Mode,

  /// Where files are copied before being rewritten, if anywhere
  backup_dir: Option<PathBuf>,

  /// Manager for rendering diffs of header updates
  diff_manager: DiffManager,

  /// File collector for pattern matching and directory traversal
  file_collector: FileCollector,

  /// Collection of file reports for generating reports
  pub file_reports: Arc<Mutex<Vec<FileReport>>>,
}

impl Processor {
  /// Batch size for processing files to reduce overhead.
  const BATCH_SIZE: usize = 8;

  /// Creates a new processor with the specified configuration.
  ///
  /// # Errors
  ///
  /// Returns an error if any of the exclude patterns is invalid.
  pub fn new(config: ProcessorConfig) -> Result<Self> {
    let mut file_collector = FileCollector::new(config.workspace_root.clone(), &config.exclude_patterns)?;
    if let Some(backup_dir) = &config.backup_dir {
      file_collector = file_collector.skip_dir(absolutize_path(backup_dir)?);
    }

    Ok(Self {
      workspace_root: config.workspace_root,
      header: config.header,
      registry: config.registry,
      years: config.years,
      mode: config.mode,
      backup_dir: config.backup_dir,
      diff_manager: config.diff_manager.unwrap_or_default(),
      file_collector,
      file_reports: Arc::new(Mutex::new(Vec::new())),
    })
  }

  pub const fn mode(&self) -> Mode {
    self.mode
  }

  /// Processes a list of file or directory patterns.
  ///
  /// Patterns may be files, directories (walked recursively) or globs; no
  /// pattern means the whole workspace.
  ///
  /// # Returns
  ///
  /// `true` if any file has a missing or invalid header or could not be
  /// processed.
  ///
  /// # Errors
  ///
  /// Returns an error if a glob pattern is invalid.
  pub fn process(&self, patterns: &[String]) -> Result<bool> {
    let files = self.collect(patterns)?;
    Ok(self.process_files(files))
  }

  /// Collects the files `patterns` match, without processing them.
  pub fn collect(&self, patterns: &[String]) -> Result<Vec<PathBuf>> {
    self.file_collector.collect(patterns)
  }

  /// Processes already collected files.
  ///
  /// Returns `true` if any file makes the run fail.
  pub fn process_files(&self, files: Vec<PathBuf>) -> bool {
    let mut local_reports = Vec::new();

    let files: Vec<(PathBuf, Arc<dyn HeaderComment>)> = files
      .into_iter()
      .filter_map(|path| match self.select(&path) {
        Ok(comment) => Some((path, comment)),
        Err(reason) => {
          trace!("Skipping: {} ({})", path.display(), reason);
          local_reports.push(FileReport::new(path, FileStatus::Skipped(reason.to_string())));
          None
        }
      })
      .collect();

    if files.is_empty() {
      debug!("No files to process after filtering");
      return self.merge_reports(local_reports);
    }

    let files_len = files.len();
    let process_start = std::time::Instant::now();

    let batches: Vec<Vec<(PathBuf, Arc<dyn HeaderComment>)>> =
      files.chunks(Self::BATCH_SIZE).map(<[_]>::to_vec).collect();

    debug!(
      "Processing {} files in {} batches (batch size: {})",
      files_len,
      batches.len(),
      Self::BATCH_SIZE
    );

    let batch_results: Vec<Vec<FileReport>> = batches
      .into_par_iter()
      .map(|batch| self.process_file_batch(batch))
      .collect();

    for batch_reports in batch_results {
      local_reports.extend(batch_reports);
    }

    debug!(
      "Processed {} files in {}ms",
      files_len,
      process_start.elapsed().as_millis()
    );

    self.merge_reports(local_reports)
  }

  /// Picks the comment strategy for `path`, or the reason it is skipped.
  fn select(&self, path: &Path) -> Result<Arc<dyn HeaderComment>, &'static str> {
    match std::fs::symlink_metadata(path) {
      Ok(metadata) if metadata.file_type().is_symlink() => return Err("Symlink"),
      Ok(_) => {}
      Err(_) => return Err("Cannot read file metadata"),
    }

    if self.file_collector.is_excluded(path) {
      return Err("Matches exclude pattern");
    }

    self
      .registry
      .find_for_path(path)
      .cloned()
      .ok_or("No comment style defined for extension")
  }

  fn merge_reports(&self, local_reports: Vec<FileReport>) -> bool {
    let has_failures = local_reports.iter().any(FileReport::is_failure);

    if !local_reports.is_empty() {
      let mut reports = self.file_reports.lock().expect("mutex poisoned");
      reports.extend(local_reports);
    }

    has_failures
  }

  /// Process a batch of files and return collected reports.
  fn process_file_batch(&self, files: Vec<(PathBuf, Arc<dyn HeaderComment>)>) -> Vec<FileReport> {
    files
      .into_iter()
      .map(|(path, comment)| {
        let status = self
          .process_single_file(&path, comment.as_ref())
          .unwrap_or_else(|e| FileStatus::Failed(format!("{e:#}")));
        FileReport::new(path, status)
      })
      .collect()
  }

  fn process_single_file(&self, path: &Path, comment: &dyn HeaderComment) -> Result<FileStatus> {
    trace!("Processing {} with {} comments", path.display(), comment.name());

    let source = FileIO::read_full_content(path)?;
    let block = comment.read_header_comment(&source);

    match self.mode {
      Mode::Check => self.check(path, comment, &source, &block),
      Mode::Apply => self.apply(path, comment, &source, &block),
    }
  }

  fn check(&self, path: &Path, comment: &dyn HeaderComment, source: &str, block: &CommentBlock) -> Result<FileStatus> {
    let status = match &block.existing {
      None => FileStatus::Missing,
      Some(existing) => {
        let errors = self.header.validate(existing);
        if errors.is_empty() {
          FileStatus::Valid
        } else {
          FileStatus::Invalid(errors.iter().map(ToString::to_string).collect())
        }
      }
    };

    if self.diff_manager.show_diff
      && let Some(updated) = self.updated_content(path, comment, source, block)?
    {
      self.diff_manager.display_diff(path, source, &updated);
    }

    Ok(status)
  }

  fn apply(&self, path: &Path, comment: &dyn HeaderComment, source: &str, block: &CommentBlock) -> Result<FileStatus> {
    let Some(updated) = self.updated_content(path, comment, source, block)? else {
      return Ok(FileStatus::Unchanged);
    };

    if let Some(backup_dir) = &self.backup_dir {
      let backup = FileIO::backup_file(&absolutize_path(path)?, &self.workspace_root, backup_dir)?;
      trace!("Backed up {} to {}", path.display(), backup.display());
    }

    FileIO::write_file(path, &updated)?;
    info_log!("Updated header of: {}", path.display());

    Ok(FileStatus::Updated)
  }

  /// The file content with an up to date header, or `None` when the header
  /// needs no change.
  fn updated_content(
    &self,
    path: &Path,
    comment: &dyn HeaderComment,
    source: &str,
    block: &CommentBlock,
  ) -> Result<Option<String>> {
    let lines = self.header.format_with(
      |rule| self.years.context_for(rule.year_selection_mode(), path),
      block.existing.as_deref(),
    )?;

    let Some(lines) = lines else {
      return Ok(None);
    };

    let header = comment.write_header_comment(&lines, block.separator);
    let updated = ContentTransformer::splice(source, block, &header);

    Ok((updated != source).then_some(updated))
  }
}
