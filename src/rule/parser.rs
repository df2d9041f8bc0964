//! Template text to [`HeaderRule`].
//!
//! A template is a list of lines. Lines starting with `#` are directives:
//!
//! - `#optional` / `#end` delimit a block of optional lines
//! - `#type VAR TYPE` declares the type of a variable
//! - `#year_selection project|file` picks where years come from
//!
//! Every other line is header content, in which `${NAME}` references a
//! variable. A `$` preceded by an odd number of backslashes is kept as text.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::trace;

use super::variable::{DynVariableType, VariableRegistry, default_variables};
use super::{HeaderLine, HeaderRule, RuleToken, YearSelectionMode, trim_lines};
use crate::error::RuleParseError;

impl HeaderRule {
  /// Parses a rule from raw template lines, using the builtin variable types.
  ///
  /// # Errors
  ///
  /// Returns an error carrying the offending line index if a directive is
  /// malformed or unknown, or if a variable is used without being declared.
  pub fn parse<S: AsRef<str>>(name: impl Into<String>, raw: &[S]) -> Result<Self, RuleParseError> {
    Self::parse_with(name, raw, VariableRegistry::builtin())
  }

  /// Parses a rule from a whole template text.
  pub fn from_template(name: impl Into<String>, template: &str) -> Result<Self, RuleParseError> {
    let lines: Vec<&str> = template.lines().collect();
    Self::parse(name, &lines)
  }

  /// Parses a rule from raw template lines, resolving `#type` directives
  /// against `registry`.
  pub fn parse_with<S: AsRef<str>>(
    name: impl Into<String>,
    raw: &[S],
    registry: &VariableRegistry,
  ) -> Result<Self, RuleParseError> {
    let name = name.into();
    let mut lines = Vec::with_capacity(raw.len());
    let mut variables: BTreeMap<String, Arc<dyn DynVariableType>> = BTreeMap::new();
    let mut year_selection_mode = YearSelectionMode::default();
    let mut optional = false;

    for (index, line) in raw.iter().enumerate() {
      let line = line.as_ref();

      let Some(instruction) = line.strip_prefix('#') else {
        lines.push(tokenize_line(line, optional));
        continue;
      };

      let args: Vec<&str> = instruction.split_whitespace().collect();
      match args.as_slice() {
        [] => return Err(RuleParseError::new(index, "No valid instructions could be found.")),
        ["optional", ..] => optional = true,
        ["end", ..] => optional = false,
        ["type", variable, type_name] => {
          let Some(variable_type) = registry.get(type_name) else {
            return Err(RuleParseError::new(
              index,
              format!("Invalid variable type \"{type_name}\" for variable \"{variable}\"."),
            ));
          };
          variables.insert((*variable).to_string(), variable_type);
        }
        ["type", ..] => {
          return Err(RuleParseError::new(
            index,
            "Invalid type instruction. Expected variable name and type.",
          ));
        }
        ["year_selection", mode] => {
          year_selection_mode = YearSelectionMode::by_name(mode)
            .ok_or_else(|| RuleParseError::new(index, format!("Invalid year selection mode \"{mode}\".")))?;
        }
        ["year_selection", ..] => {
          return Err(RuleParseError::new(
            index,
            "Invalid year selection instruction. Expected selection mode (project or file).",
          ));
        }
        [other, ..] => {
          return Err(RuleParseError::new(index, format!("Unknown instruction: \"{other}\".")));
        }
      }
    }

    trim_lines(&mut lines, HeaderLine::is_empty);

    // The default variables always keep their builtin types.
    variables.extend(default_variables());

    trace!("Parsed header rule '{}' with {} lines", name, lines.len());

    Self::new(name, lines, variables, year_selection_mode)
  }
}

/// Splits a content line into text and variable tokens.
fn tokenize_line(line: &str, optional: bool) -> HeaderLine {
  let bytes = line.as_bytes();
  let mut tokens = Vec::new();
  let mut landmark = 0;
  let mut escaped = false;
  let mut index = 0;

  while index < bytes.len() {
    match bytes[index] {
      b'$' if !escaped && bytes.get(index + 1) == Some(&b'{') => {
        if let Some(variable) = read_var(line, index + 2) {
          if landmark != index {
            tokens.push(RuleToken::text(&line[landmark..index]));
          }
          tokens.push(RuleToken::var(variable));

          // Skip over `${`, the name and `}`.
          index += variable.len() + 3;
          landmark = index;
          continue;
        }
      }
      b'\\' => escaped = !escaped,
      _ => escaped = false,
    }

    index += 1;
  }

  if landmark < line.len() {
    tokens.push(RuleToken::text(&line[landmark..]));
  }

  HeaderLine::new(tokens, optional)
}

/// Reads a variable name starting at `start`, up to a closing `}`.
fn read_var(line: &str, start: usize) -> Option<&str> {
  let rest = line.get(start..)?;
  let end = rest.find(|c: char| !(c == '_' || c.is_ascii_alphanumeric()))?;

  (end > 0 && rest[end..].starts_with('}')).then(|| &rest[..end])
}
