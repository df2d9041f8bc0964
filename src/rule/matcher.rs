//! Matching existing header lines against a [`HeaderRule`].

use std::collections::HashMap;

use tracing::trace;

use super::{HeaderLine, HeaderRule, ParsedData, RuleToken, VariableValue};
use crate::error::HeaderParseError;

/// Why a single header line did not match a rule line.
struct LineMismatch {
  message: String,
  /// Values bound before the mismatch was found.
  bindings: HashMap<String, VariableValue>,
}

impl HeaderRule {
  /// Matches `header` against this rule, reading variable values on the way.
  ///
  /// An optional rule line that does not match is considered absent and the
  /// header line is tried against the next rule line instead. Any error is
  /// reported in [`ParsedData::error`] along with the values read so far.
  pub fn parse_header<S: AsRef<str>>(&self, header: &[S]) -> ParsedData {
    let mut data = ParsedData::empty();
    let mut rule_index = 0;

    for (header_index, header_line) in header.iter().enumerate() {
      let header_line = header_line.as_ref();

      if rule_index >= self.lines.len() {
        data.error = Some(HeaderParseError::new(
          header_index,
          "There is unexpected extra header lines.",
        ));
        return data;
      }

      loop {
        let rule_line = &self.lines[rule_index];

        match self.match_line(header_line, rule_line, &data.variables) {
          Ok(bindings) => {
            data.variables.extend(bindings);
            if rule_line.optional {
              data.present_optional_lines.insert(rule_index);
            }
            break;
          }
          Err(_) if rule_line.optional && rule_index + 1 < self.lines.len() => {
            trace!(
              "Optional line {} of rule '{}' is absent at header line {}",
              rule_index, self.name, header_index
            );
            rule_index += 1;
          }
          Err(mismatch) => {
            data.variables.extend(mismatch.bindings);
            data.error = Some(HeaderParseError::new(header_index, mismatch.message));
            return data;
          }
        }
      }

      rule_index += 1;
    }

    data
  }

  /// Matches a single header line, returning the values it binds.
  fn match_line(
    &self,
    line: &str,
    rule_line: &HeaderLine,
    known: &HashMap<String, VariableValue>,
  ) -> Result<HashMap<String, VariableValue>, LineMismatch> {
    let mut bindings: HashMap<String, VariableValue> = HashMap::new();

    // Comment writers normalize blank lines, so their exact whitespace is lost.
    if rule_line.is_empty() && line.trim().is_empty() {
      return Ok(bindings);
    }

    let mut cursor = 0;

    for token in &rule_line.tokens {
      match token {
        RuleToken::Text(text) => {
          let end = cursor + text.len();

          if end > line.len() {
            return Err(LineMismatch {
              message: format!("Header is cut short, stopped at {} instead of {end}.", line.len()),
              bindings,
            });
          }

          let found = &line.as_bytes()[cursor..end];
          if found != text.as_bytes() {
            return Err(LineMismatch {
              message: format!(
                "Text differs at {cursor}, got \"{}\", expected \"{text}\".",
                String::from_utf8_lossy(found)
              ),
              bindings,
            });
          }

          cursor = end;
        }
        RuleToken::Var(name) => {
          let Some(result) = self
            .variables
            .get(name)
            .and_then(|variable_type| variable_type.parse_dyn(line, cursor))
          else {
            return Err(LineMismatch {
              message: format!("Failed to parse variable \"{name}\" at {cursor}."),
              bindings,
            });
          };

          let previous = bindings.get(name).or_else(|| known.get(name));
          if previous.is_some_and(|previous| *previous != result.value) {
            return Err(LineMismatch {
              message: format!("Diverging variable values for \"{name}\"."),
              bindings,
            });
          }

          bindings.insert(name.clone(), result.value);
          cursor = result.end;
        }
      }
    }

    Ok(bindings)
  }
}
