//! Producing up-to-date header lines from a [`HeaderRule`].

use super::{HeaderFileContext, HeaderLine, HeaderRule, ParsedData, RuleToken, trim_lines};

impl HeaderRule {
  /// Renders the header for a file, refreshing every variable from `data`.
  ///
  /// Optional lines are only kept when they were present in the matched
  /// header. Blank lines at either end of the result are dropped.
  pub fn apply(&self, data: &ParsedData, context: &HeaderFileContext) -> Vec<String> {
    let mut result: Vec<String> = self
      .lines
      .iter()
      .enumerate()
      .filter(|(index, line)| !line.optional || data.present_optional_lines.contains(index))
      .map(|(_, line)| self.render_line(line, data, context))
      .collect();

    trim_lines(&mut result, |line| line.trim().is_empty());

    result
  }

  fn render_line(&self, line: &HeaderLine, data: &ParsedData, context: &HeaderFileContext) -> String {
    let mut output = String::new();
    if line.is_empty() {
      return output;
    }

    for token in &line.tokens {
      match token {
        RuleToken::Text(text) => output.push_str(text),
        RuleToken::Var(name) => {
          if let Some(variable_type) = self.variables.get(name) {
            let value = variable_type.refresh_dyn(context, data.variables.get(name));
            output.push_str(&variable_type.format_dyn(&value));
          }
        }
      }
    }

    output
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const TEMPLATE: &str = "\
#type YEARS YEAR_LIST
Copyright ${YEARS} Yumi Project

#optional
Originally written in ${CREATION_YEAR}.
#end
See ${FILE_NAME} for details.";

  fn rule() -> HeaderRule {
    HeaderRule::from_template("Test", TEMPLATE).expect("rule should parse")
  }

  #[test]
  fn test_render_without_header() {
    let context = HeaderFileContext::new("Main.java", 2021, 2023);
    let lines = rule().apply(&ParsedData::empty(), &context);

    assert_eq!(
      lines,
      vec![
        "Copyright 2021, 2022, 2023 Yumi Project",
        "",
        "See Main.java for details.",
      ]
    );
  }

  #[test]
  fn test_render_keeps_present_optional_lines() {
    let rule = rule();
    let existing = vec![
      "Copyright 2019, 2021 Yumi Project",
      "",
      "Originally written in 2018.",
      "See Old.java for details.",
    ];
    let data = rule.parse_header(&existing);
    assert!(data.is_ok());

    let context = HeaderFileContext::new("Main.java", 2020, 2023);
    assert_eq!(
      rule.apply(&data, &context),
      vec![
        "Copyright 2019, 2021, 2022, 2023 Yumi Project",
        "",
        "Originally written in 2018.",
        "See Main.java for details.",
      ]
    );
  }

  #[test]
  fn test_render_is_a_fixed_point() {
    let rule = rule();
    let context = HeaderFileContext::new("Main.java", 2020, 2024);

    let first = rule.apply(&ParsedData::empty(), &context);
    let data = rule.parse_header(&first);
    assert!(data.is_ok(), "{:?}", data.error);

    assert_eq!(rule.apply(&data, &context), first);
  }

  #[test]
  fn test_render_normalizes_blank_lines() {
    let rule = HeaderRule::parse("Test", &["Top", "   ", "Bottom"]).expect("rule should parse");
    let context = HeaderFileContext::new("Main.java", 2020, 2020);

    let rendered = rule.apply(&ParsedData::empty(), &context);
    assert_eq!(rendered, vec!["Top", "", "Bottom"]);
    assert!(rule.parse_header(&rendered).is_ok());
  }

  #[test]
  fn test_render_trims_blank_edges() {
    let rule = HeaderRule::parse("Test", &["#optional", "Maybe", "#end", "", "Always"]).expect("rule should parse");
    let context = HeaderFileContext::new("Main.java", 2020, 2020);

    assert_eq!(rule.apply(&ParsedData::empty(), &context), vec!["Always"]);
  }
}
