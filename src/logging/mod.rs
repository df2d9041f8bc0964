//! # Logging Module
//!
//! Next to the `tracing` diagnostics set up by [`init_tracing`], licenser has
//! two plain-text channels:
//!
//! * [`verbose_log!`] reports what the run is doing (config discovery, rule
//!   loading) on stderr, only after `-v`.
//! * [`info_log!`] announces rewritten headers and generated reports on stdout,
//!   unless `-q` was given.
//!
//! With `-q` stdout therefore carries nothing but failing paths.
//!
//! ```rust
//! use licenser::logging::set_verbose;
//! use licenser::verbose_log;
//!
//! set_verbose();
//! verbose_log!("Loading header rule '{}' from {}", "HEADER", "codeformat/HEADER");
//! ```

mod modes;

use std::fmt;
use std::io::{self, Write};

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// Prints a progress detail to stderr when running with `-v`.
#[macro_export]
macro_rules! verbose_log {
  ($($arg:tt)*) => {
    $crate::logging::write_verbose(format_args!($($arg)*))
  };
}

/// Prints a notice about a changed file or written report to stdout, unless
/// running with `-q`.
#[macro_export]
macro_rules! info_log {
  ($($arg:tt)*) => {
    $crate::logging::write_info(format_args!($($arg)*))
  };
}

#[doc(hidden)]
pub fn write_verbose(message: fmt::Arguments<'_>) {
  if is_verbose() {
    eprintln!("{}", message.if_supports_color(Stream::Stderr, |m| m.dimmed()));
  }
}

#[doc(hidden)]
pub fn write_info(message: fmt::Arguments<'_>) {
  if is_quiet() {
    return;
  }

  // A closed pipe must not abort a run that is rewriting files.
  let _ = writeln!(
    io::stdout().lock(),
    "{}",
    message.if_supports_color(Stream::Stdout, |m| m.yellow())
  );
}
