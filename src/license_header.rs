//! # License Header Module
//!
//! A [`LicenseHeader`] is the ordered set of rules a project accepts. Rules are
//! tried in order and the first one matching an existing header wins; the
//! first rule is also the default used when no rule matches.
//!
//! Rules are collected with a [`LicenseHeaderBuilder`] during configuration.
//! Once built, a [`LicenseHeader`] is immutable and can be shared freely
//! between worker threads.

use std::convert::Infallible;
use std::fmt;

use tracing::trace;

use crate::error::{HeaderParseError, LicenseHeaderError};
use crate::rule::{HeaderFileContext, HeaderRule, ParsedData};

/// A rule that rejected a header, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
  /// Name of the rule.
  pub rule: String,
  pub error: HeaderParseError,
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.rule, self.error.message)
  }
}

/// Collects header rules before they are frozen into a [`LicenseHeader`].
#[derive(Debug, Default)]
pub struct LicenseHeaderBuilder {
  rules: Vec<HeaderRule>,
}

impl LicenseHeaderBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends a rule. The first rule added is the default one.
  pub fn rule(mut self, rule: HeaderRule) -> Self {
    self.rules.push(rule);
    self
  }

  /// Parses `template` and appends the resulting rule.
  pub fn template(self, name: impl Into<String>, template: &str) -> Result<Self, LicenseHeaderError> {
    let name = name.into();
    let rule = HeaderRule::from_template(name.clone(), template)
      .map_err(|source| LicenseHeaderError::InvalidRule { name, source })?;
    Ok(self.rule(rule))
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  /// Freezes the collected rules.
  ///
  /// # Errors
  ///
  /// Returns [`LicenseHeaderError::NoRules`] if no rule was added.
  pub fn build(self) -> Result<LicenseHeader, LicenseHeaderError> {
    if self.rules.is_empty() {
      return Err(LicenseHeaderError::NoRules);
    }

    Ok(LicenseHeader { rules: self.rules })
  }
}

/// An ordered, non-empty list of header rules.
#[derive(Debug, Clone)]
pub struct LicenseHeader {
  rules: Vec<HeaderRule>,
}

impl LicenseHeader {
  pub fn builder() -> LicenseHeaderBuilder {
    LicenseHeaderBuilder::new()
  }

  pub fn rules(&self) -> &[HeaderRule] {
    &self.rules
  }

  /// The rule used to write headers when no rule matches.
  pub fn default_rule(&self) -> &HeaderRule {
    &self.rules[0]
  }

  /// Checks `header` against every rule in order.
  ///
  /// Returns an empty list as soon as one rule matches, otherwise one error per
  /// rule.
  pub fn validate<S: AsRef<str>>(&self, header: &[S]) -> Vec<ValidationError> {
    let mut errors = Vec::with_capacity(self.rules.len());

    for rule in &self.rules {
      match rule.parse_header(header).error {
        None => return Vec::new(),
        Some(error) => errors.push(ValidationError {
          rule: rule.name().to_string(),
          error,
        }),
      }
    }

    errors
  }

  /// Computes the header a file should have, using the same context whatever
  /// the rule chosen.
  ///
  /// Returns `None` when `existing` is already up to date.
  pub fn format(&self, context: &HeaderFileContext, existing: Option<&[String]>) -> Option<Vec<String>> {
    match self.format_with(|_| Ok::<_, Infallible>(context.clone()), existing) {
      Ok(lines) => lines,
      Err(never) => match never {},
    }
  }

  /// Computes the header a file should have.
  ///
  /// `resolve` builds the file context for the rule that ends up being
  /// rendered, which lets callers honour the rule's year selection mode. It is
  /// called exactly once.
  ///
  /// Returns `Ok(None)` when `existing` is already up to date.
  pub fn format_with<E>(
    &self,
    resolve: impl FnOnce(&HeaderRule) -> Result<HeaderFileContext, E>,
    existing: Option<&[String]>,
  ) -> Result<Option<Vec<String>>, E> {
    let Some(existing) = existing else {
      trace!("No existing header, using default rule '{}'", self.default_rule().name());
      let rule = self.default_rule();
      let context = resolve(rule)?;
      return Ok(Some(rule.apply(&ParsedData::empty(), &context)));
    };

    let mut first = None;
    let mut chosen = None;

    for rule in &self.rules {
      let data = rule.parse_header(existing);

      if data.is_ok() {
        trace!("Existing header matches rule '{}'", rule.name());
        chosen = Some((rule, data));
        break;
      }

      if first.is_none() {
        first = Some(data);
      }
    }

    let (rule, data) = chosen.unwrap_or_else(|| {
      trace!("No rule matches, using default rule '{}'", self.default_rule().name());
      (self.default_rule(), first.unwrap_or_default())
    });

    let context = resolve(rule)?;
    let header = rule.apply(&data, &context);

    Ok((header.as_slice() != existing).then_some(header))
  }
}
