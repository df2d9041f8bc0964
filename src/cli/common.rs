//! # Shared Command Flow
//!
//! Arguments and the processing flow shared by `check` and `apply`.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crate::comment::CommentRegistry;
use crate::config::{Config, load_config, load_license_header};
use crate::diff::DiffManager;
use crate::git::{GitHistory, discover_repo_root};
use crate::info_log;
use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::{
  CategorizedReports, print_all_files_ok, print_blank_line, print_failed_files, print_hint, print_invalid_files,
  print_missing_files, print_start_message, print_summary, print_updated_files,
};
use crate::processor::{Mode, Processor, ProcessorConfig};
use crate::report::{ProcessingSummary, ReportGenerator};
use crate::years::YearResolver;

/// Directory, relative to the workspace root, where `apply` backs files up
/// unless configured otherwise.
pub const DEFAULT_BACKUP_DIR: &str = ".licenser-backup";

/// Arguments shared by every command
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
  /// File, directory or glob patterns to process. Directories are processed
  /// recursively.
  #[arg(default_value = ".")]
  pub patterns: Vec<String>,

  /// Path to config file (default: .licenser.toml in workspace root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Header template file (repeatable). The first one is the default rule.
  /// Replaces the rules of the config file.
  #[arg(long, short = 'r', value_name = "FILE")]
  pub rule: Vec<PathBuf>,

  /// File patterns to exclude (repeatable, glob patterns relative to the
  /// workspace root)
  #[arg(long, short = 'e', value_name = "GLOB")]
  pub exclude: Vec<String>,

  /// Year used as the last modification year of every file
  #[arg(long)]
  pub year: Option<i32>,

  /// Creation year of the project, for rules in `project` year mode
  #[arg(long, value_name = "YEAR")]
  pub project_creation_year: Option<i32>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,

  /// Generate a JSON report of header status and save to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,
}

/// Mode specific options of a run.
pub(super) struct RunOptions {
  pub mode: Mode,
  pub show_diff: bool,
  pub backup: bool,
}

impl CommonArgs {
  /// Sets up logging, verbosity and colors.
  pub(super) fn init_output(&self) {
    init_tracing(self.quiet, self.verbose);

    if self.verbose > 0 {
      set_verbose();
    } else if self.quiet {
      set_quiet();
    }
    self.colors.apply();
  }

  /// Rule files to load: the ones given on the command line, else the
  /// configured ones.
  fn rule_paths(&self, config: Option<&Config>) -> Vec<PathBuf> {
    if !self.rule.is_empty() {
      return self.rule.clone();
    }

    config.map(Config::rule_paths).unwrap_or_default()
  }
}

/// Runs `mode` over the files matched by `args`, prints the outcome and writes
/// the requested reports.
pub(super) fn run(args: CommonArgs, options: RunOptions) -> Result<ProcessingSummary> {
  let current_dir = std::env::current_dir().context("Failed to get current directory")?;
  let workspace_root = resolve_project_root(&args.patterns, &current_dir)?;
  debug!("Using workspace root: {}", workspace_root.display());

  let config = load_config(args.config.as_deref(), &workspace_root, args.no_config)?;

  let rule_paths = args.rule_paths(config.as_ref());
  if rule_paths.is_empty() {
    eprintln!("ERROR: No header rule given");
    eprintln!("Pass --rule <FILE> or list templates under `rules` in .licenser.toml");
    process::exit(1);
  }

  let header = load_license_header(&rule_paths)?;
  debug!("Loaded {} header rules", header.rules().len());

  let registry = config
    .as_ref()
    .map(Config::comment_registry)
    .unwrap_or_else(CommentRegistry::builtin);

  let mut exclude_patterns = config.as_ref().map(|c| c.exclude.clone()).unwrap_or_default();
  exclude_patterns.extend(args.exclude.iter().cloned());

  let backup_dir = options.backup.then(|| {
    config
      .as_ref()
      .and_then(Config::backup_dir)
      .unwrap_or_else(|| workspace_root.join(DEFAULT_BACKUP_DIR))
  });

  let years = YearResolver::new(workspace_root.clone(), Arc::new(GitHistory))
    .with_project_creation_year(
      args
        .project_creation_year
        .or_else(|| config.as_ref().and_then(|c| c.project_creation_year)),
    )
    .with_year_override(args.year);

  let processor = Processor::new(ProcessorConfig {
    registry,
    workspace_root: workspace_root.clone(),
    exclude_patterns,
    backup_dir,
    diff_manager: Some(DiffManager::new(options.show_diff)),
    ..ProcessorConfig::new(Arc::new(header), Arc::new(years), options.mode)
  })?;

  let files = processor.collect(&args.patterns)?;
  print_start_message(files.len(), options.mode);

  // Start timing
  let start_time = Instant::now();
  processor.process_files(files);
  let elapsed = start_time.elapsed();

  let file_reports = std::mem::take(&mut *processor.file_reports.lock().expect("mutex poisoned"));
  let summary = ProcessingSummary::from_reports(&file_reports, elapsed);
  let categorized = CategorizedReports::from_reports(&file_reports);
  let root = Some(workspace_root.as_path());

  print_blank_line();

  match options.mode {
    Mode::Check => {
      print_missing_files(&categorized.missing, root);
      print_invalid_files(&categorized.invalid, root);
    }
    Mode::Apply => print_updated_files(&categorized.updated, root),
  }
  print_failed_files(&categorized.failed, root);

  if !categorized.has_failures() && categorized.updated.is_empty() {
    print_all_files_ok(options.mode);
  }

  print_blank_line();
  print_summary(&summary, options.mode);

  if options.mode == Mode::Check && categorized.has_failures() {
    print_blank_line();
    print_hint("Run `licenser apply` to add missing headers and fix invalid ones.");
  }

  // Generate JSON report if requested
  if let Some(ref output_path) = args.report_json {
    let report_generator = ReportGenerator::new(output_path);
    if let Err(e) = report_generator.generate(&file_reports, &summary) {
      eprintln!("Error generating JSON report: {:#}", e);
    } else {
      info_log!("Generated JSON report at {}", output_path.display());
    }
  }

  Ok(summary)
}

/// The directory config, backups and excludes are resolved against: the git
/// repository holding the first existing pattern, else that pattern's
/// directory. Globs and missing paths fall back to `current_dir`.
fn resolve_project_root(patterns: &[String], current_dir: &Path) -> Result<PathBuf> {
  let anchor = patterns
    .iter()
    .map(|pattern| current_dir.join(pattern).components().collect::<PathBuf>())
    .find_map(|path| {
      if path.is_dir() {
        Some(path)
      } else if path.is_file() {
        path.parent().map(Path::to_path_buf)
      } else {
        None
      }
    })
    .unwrap_or_else(|| current_dir.to_path_buf());

  Ok(discover_repo_root(&anchor)?.unwrap_or(anchor))
}
