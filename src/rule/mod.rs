//! # Rule Module
//!
//! Header rules describe what a valid license header looks like. A rule is an
//! ordered list of [`HeaderLine`]s, each made of literal text and references to
//! typed variables, some of them optional.
//!
//! The module is organized into several submodules:
//! - [`token`] - The tokens making up a rule line
//! - [`variable`] - Variable types and their registry
//! - `parser` - Template text to [`HeaderRule`]
//! - `matcher` - Matching an existing header against a rule
//! - `render` - Producing an up-to-date header from a rule
//!
//! ## Example
//!
//! ```rust
//! use licenser::rule::{HeaderFileContext, HeaderRule};
//!
//! # fn main() -> anyhow::Result<()> {
//! let rule = HeaderRule::from_template(
//!   "MPL",
//!   "Copyright ${CREATION_YEAR} Yumi Project\n\n#optional\nSee ${FILE_NAME}.\n#end",
//! )?;
//!
//! let existing = vec!["Copyright 2021 Yumi Project".to_string()];
//! let parsed = rule.parse_header(&existing);
//! assert!(parsed.error.is_none());
//!
//! let context = HeaderFileContext::new("Main.java", 2023, 2024);
//! assert_eq!(rule.apply(&parsed, &context), existing);
//! # Ok(())
//! # }
//! ```

mod matcher;
mod parser;
mod render;
pub mod token;
pub mod variable;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub use token::RuleToken;
pub use variable::{DynVariableType, VariableRegistry, VariableType, VariableValue, YearRange};

use crate::error::{HeaderParseError, RuleParseError};

/// Whether a rule's years are project-wide or tracked per file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum YearSelectionMode {
  /// A change anywhere in the project updates every file.
  #[default]
  Project,
  /// Each file has its own years.
  File,
}

impl YearSelectionMode {
  /// Parses a mode name, ignoring case.
  pub fn by_name(name: &str) -> Option<Self> {
    match name.to_ascii_lowercase().as_str() {
      "project" => Some(Self::Project),
      "file" => Some(Self::File),
      _ => None,
    }
  }
}

impl fmt::Display for YearSelectionMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Project => f.write_str("project"),
      Self::File => f.write_str("file"),
    }
  }
}

/// Per-file data used to refresh variable values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFileContext {
  /// Base name of the file.
  pub file_name: String,
  pub creation_year: i32,
  pub last_modified_year: i32,
}

impl HeaderFileContext {
  pub fn new(file_name: impl Into<String>, creation_year: i32, last_modified_year: i32) -> Self {
    Self {
      file_name: file_name.into(),
      creation_year,
      last_modified_year,
    }
  }
}

/// A line of a header rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HeaderLine {
  pub tokens: Vec<RuleToken>,
  pub optional: bool,
}

impl HeaderLine {
  pub const fn new(tokens: Vec<RuleToken>, optional: bool) -> Self {
    Self { tokens, optional }
  }

  /// A line is empty when it has no tokens or only blank text.
  pub fn is_empty(&self) -> bool {
    match self.tokens.as_slice() {
      [] => true,
      [RuleToken::Text(content)] => content.trim().is_empty(),
      _ => false,
    }
  }

  /// Names of the variables referenced by this line, in order.
  pub fn variables(&self) -> impl Iterator<Item = &str> {
    self.tokens.iter().filter_map(|token| match token {
      RuleToken::Var(name) => Some(name.as_str()),
      RuleToken::Text(_) => None,
    })
  }
}

/// A parsed header template.
///
/// Two rules are equal when their lines are equal; the name and the variable
/// declarations are not part of a rule's identity.
#[derive(Clone)]
pub struct HeaderRule {
  name: String,
  lines: Vec<HeaderLine>,
  variables: BTreeMap<String, Arc<dyn DynVariableType>>,
  year_selection_mode: YearSelectionMode,
}

impl HeaderRule {
  /// Builds a rule from already tokenized lines.
  ///
  /// # Errors
  ///
  /// Returns an error naming every variable referenced by `lines` that has no
  /// entry in `variables`.
  pub fn new(
    name: impl Into<String>,
    lines: Vec<HeaderLine>,
    variables: BTreeMap<String, Arc<dyn DynVariableType>>,
    year_selection_mode: YearSelectionMode,
  ) -> Result<Self, RuleParseError> {
    let undeclared: BTreeSet<&str> = lines
      .iter()
      .flat_map(HeaderLine::variables)
      .filter(|name| !variables.contains_key(*name))
      .collect();

    if !undeclared.is_empty() {
      return Err(RuleParseError::new(
        0,
        format!(
          "Undeclared variables found: {}.",
          undeclared.into_iter().collect::<Vec<_>>().join(", ")
        ),
      ));
    }

    Ok(Self {
      name: name.into(),
      lines,
      variables,
      year_selection_mode,
    })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn lines(&self) -> &[HeaderLine] {
    &self.lines
  }

  pub const fn year_selection_mode(&self) -> YearSelectionMode {
    self.year_selection_mode
  }

  /// The type declared for `name`, if any.
  pub fn variable_type(&self, name: &str) -> Option<&Arc<dyn DynVariableType>> {
    self.variables.get(name)
  }

  /// Names of all declared variables, including the defaults.
  pub fn variable_names(&self) -> impl Iterator<Item = &str> {
    self.variables.keys().map(String::as_str)
  }
}

impl PartialEq for HeaderRule {
  fn eq(&self, other: &Self) -> bool {
    self.lines == other.lines
  }
}

impl Eq for HeaderRule {}

impl Hash for HeaderRule {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.lines.hash(state);
  }
}

impl fmt::Debug for HeaderRule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("HeaderRule")
      .field("name", &self.name)
      .field("lines", &self.lines)
      .field("variables", &self.variables.keys().collect::<Vec<_>>())
      .field("year_selection_mode", &self.year_selection_mode)
      .finish()
  }
}

/// The result of matching a header against a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedData {
  /// Variable values read from the header.
  pub variables: HashMap<String, VariableValue>,
  /// Indices of the rule's optional lines found in the header.
  pub present_optional_lines: BTreeSet<usize>,
  /// Why matching failed, if it did.
  pub error: Option<HeaderParseError>,
}

impl ParsedData {
  /// Data for a file that has no header at all.
  pub fn empty() -> Self {
    Self::default()
  }

  pub const fn is_ok(&self) -> bool {
    self.error.is_none()
  }
}

/// Removes the empty items at both ends of `list`, keeping interior ones.
pub(crate) fn trim_lines<T>(list: &mut Vec<T>, is_empty: impl Fn(&T) -> bool) {
  let end = list.iter().rposition(|item| !is_empty(item)).map_or(0, |index| index + 1);
  list.truncate(end);

  let start = list.iter().position(|item| !is_empty(item)).unwrap_or(list.len());
  list.drain(..start);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_header_line_is_empty() {
    assert!(HeaderLine::new(vec![], false).is_empty());
    assert!(HeaderLine::new(vec![RuleToken::text("   ")], true).is_empty());
    assert!(!HeaderLine::new(vec![RuleToken::text("x")], false).is_empty());
    assert!(!HeaderLine::new(vec![RuleToken::var("CREATION_YEAR")], false).is_empty());
    assert!(!HeaderLine::new(vec![RuleToken::text(" "), RuleToken::text(" ")], false).is_empty());
  }

  #[test]
  fn test_year_selection_mode_by_name() {
    assert_eq!(YearSelectionMode::by_name("FILE"), Some(YearSelectionMode::File));
    assert_eq!(YearSelectionMode::by_name("Project"), Some(YearSelectionMode::Project));
    assert_eq!(YearSelectionMode::by_name("module"), None);
  }

  #[test]
  fn test_rule_equality_ignores_name_and_variables() {
    let lines = vec![HeaderLine::new(vec![RuleToken::text("Header")], false)];
    let a = HeaderRule::new("A", lines.clone(), variable::default_variables(), YearSelectionMode::Project)
      .expect("valid rule");
    let b =
      HeaderRule::new("B", lines, BTreeMap::new(), YearSelectionMode::File).expect("valid rule");
    assert_eq!(a, b);
  }

  #[test]
  fn test_rule_new_rejects_undeclared_variables() {
    let lines = vec![HeaderLine::new(
      vec![RuleToken::var("B"), RuleToken::var("A"), RuleToken::var("CREATION_YEAR")],
      false,
    )];
    let err = HeaderRule::new("Test", lines, variable::default_variables(), YearSelectionMode::Project)
      .expect_err("should fail");
    assert_eq!(err.message, "Undeclared variables found: A, B.");
  }

  #[test]
  fn test_trim_lines() {
    let mut lines = vec!["", "", "a", "", "b", "", ""];
    trim_lines(&mut lines, |line| line.is_empty());
    assert_eq!(lines, vec!["a", "", "b"]);

    let mut blank = vec!["", ""];
    trim_lines(&mut blank, |line| line.is_empty());
    assert!(blank.is_empty());
  }
}
