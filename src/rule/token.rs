//! Tokens making up a line of a header rule.

use std::fmt;

/// A single element of a [`HeaderLine`](super::HeaderLine).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleToken {
  /// Literal text which must appear verbatim in the header.
  Text(String),
  /// A reference to a declared variable, by name.
  Var(String),
}

impl RuleToken {
  pub fn text(content: impl Into<String>) -> Self {
    Self::Text(content.into())
  }

  pub fn var(name: impl Into<String>) -> Self {
    Self::Var(name.into())
  }
}

impl fmt::Display for RuleToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Text(content) => f.write_str(content),
      Self::Var(name) => write!(f, "${{{name}}}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display_round_trips_template_syntax() {
    assert_eq!(RuleToken::text("Copyright ").to_string(), "Copyright ");
    assert_eq!(RuleToken::var("CREATION_YEAR").to_string(), "${CREATION_YEAR}");
  }
}
