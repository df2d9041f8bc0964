use std::sync::atomic::{AtomicU8, Ordering};

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Global output mode, `Normal` until [`set_verbose`] or [`set_quiet`] is
/// called.
static OUTPUT_MODE: AtomicU8 = AtomicU8::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
  Normal = 0,
  Quiet = 1,
  Verbose = 2,
}

impl OutputMode {
  const fn from_u8(value: u8) -> Self {
    match value {
      1 => OutputMode::Quiet,
      2 => OutputMode::Verbose,
      _ => OutputMode::Normal,
    }
  }
}

/// Enum representing the color mode options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
  /// Automatically determine whether to use colors based on TTY detection
  #[default]
  Auto,
  /// Never use colors
  Never,
  /// Always use colors
  Always,
}

impl ColorMode {
  /// Makes every `if_supports_color` call honour this mode.
  pub fn apply(self) {
    match self {
      ColorMode::Auto => owo_colors::unset_override(),
      ColorMode::Never => owo_colors::set_override(false),
      ColorMode::Always => owo_colors::set_override(true),
    }
  }
}

/// Installs the global `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` wins over the level derived from the flags: `-q` only shows
/// errors, then each `-v` goes one level further (info, debug, trace).
/// Calling this more than once is harmless.
pub fn init_tracing(quiet: bool, verbose: u8) {
  let level = if quiet {
    "error"
  } else {
    match verbose {
      0 => "warn",
      1 => "info",
      2 => "debug",
      _ => "trace",
    }
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("licenser={level}")));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

/// Sets the global verbose logging flag.
///
/// When verbose logging is enabled, the [`verbose_log!`](crate::verbose_log)
/// macro will output messages to stderr.
pub fn set_verbose() {
  OUTPUT_MODE.store(OutputMode::Verbose as u8, Ordering::SeqCst);
}

pub fn set_quiet() {
  OUTPUT_MODE.store(OutputMode::Quiet as u8, Ordering::SeqCst);
}

/// Checks if verbose logging is currently enabled.
pub fn is_verbose() -> bool {
  OutputMode::from_u8(OUTPUT_MODE.load(Ordering::SeqCst)) == OutputMode::Verbose
}

/// Checks if quiet mode is currently enabled.
pub fn is_quiet() -> bool {
  OutputMode::from_u8(OUTPUT_MODE.load(Ordering::SeqCst)) == OutputMode::Quiet
}
