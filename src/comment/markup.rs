use super::{CommentBlock, HeaderComment, LineSeparator};
use crate::rule::trim_lines;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

/// XML/HTML comments. Header lines are indented with a tab:
///
/// ```text
/// <!--
///   Copyright 2024 Yumi Project
/// -->
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupComment;

impl HeaderComment for MarkupComment {
  fn name(&self) -> &'static str {
    "markup"
  }

  fn read_header_comment(&self, source: &str) -> CommentBlock {
    let separator = LineSeparator::detect(source);
    let start = source.len() - source.trim_start().len();

    if !source[start..].starts_with(COMMENT_START) {
      return CommentBlock::none(separator);
    }

    let body_start = start + COMMENT_START.len();
    let (body, end) = match source[body_start..].find(COMMENT_END) {
      Some(offset) => (
        &source[body_start..body_start + offset],
        body_start + offset + COMMENT_END.len(),
      ),
      None => (&source[body_start..], source.len()),
    };

    let mut lines: Vec<String> = body
      .split('\n')
      .map(|line| unindent(line.strip_suffix('\r').unwrap_or(line)).to_string())
      .collect();
    // Only the space in front of `-->` belongs to the comment syntax.
    if let Some(last) = lines.last_mut()
      && let Some(stripped) = last.strip_suffix(' ')
    {
      *last = stripped.to_string();
    }
    trim_lines(&mut lines, String::is_empty);

    CommentBlock {
      start,
      end,
      existing: (!lines.is_empty()).then_some(lines),
      separator,
    }
  }

  fn write_header_comment(&self, lines: &[String], separator: LineSeparator) -> String {
    let separator = separator.as_str();
    let mut comment = String::from(COMMENT_START);
    comment.push_str(separator);

    for line in lines {
      if !line.trim().is_empty() {
        comment.push('\t');
        comment.push_str(line);
      }
      comment.push_str(separator);
    }

    comment.push_str(COMMENT_END);
    comment
  }
}

/// Removes the tab written in front of every line, or any other indentation.
fn unindent(line: &str) -> &str {
  line.strip_prefix('\t').unwrap_or_else(|| line.trim_start())
}
