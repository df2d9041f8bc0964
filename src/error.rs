//! # Error Module
//!
//! Error types produced by the header rule engine.
//!
//! There are two classes of errors:
//! - [`RuleParseError`] is raised while building a [`HeaderRule`] from a
//!   template. It is fatal to that rule and must be reported to whoever loads
//!   templates.
//! - [`HeaderParseError`] is produced while matching an existing header against
//!   a rule. It is never fatal: the license header aggregate simply moves on to
//!   the next rule.
//!
//! [`HeaderRule`]: crate::rule::HeaderRule

/// An error in a header template definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct RuleParseError {
  /// Index of the offending template line.
  pub line: usize,
  /// Human readable description of the problem.
  pub message: String,
}

impl RuleParseError {
  pub fn new(line: usize, message: impl Into<String>) -> Self {
    Self {
      line,
      message: message.into(),
    }
  }
}

/// An error found while matching an existing header against a rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (header line {line})")]
pub struct HeaderParseError {
  /// Index of the header line that failed to match.
  pub line: usize,
  /// Human readable description of the mismatch.
  pub message: String,
}

impl HeaderParseError {
  pub fn new(line: usize, message: impl Into<String>) -> Self {
    Self {
      line,
      message: message.into(),
    }
  }
}

/// Errors raised while assembling a [`LicenseHeader`](crate::license_header::LicenseHeader).
#[derive(Debug, thiserror::Error)]
pub enum LicenseHeaderError {
  /// No rule was registered before the configuration phase ended.
  #[error("no header rule has been configured")]
  NoRules,

  /// A template failed to parse.
  #[error("failed to parse header rule '{name}': {source}")]
  InvalidRule {
    name: String,
    #[source]
    source: RuleParseError,
  },
}
