use std::sync::LazyLock;

use regex::Regex;

use super::{CommentBlock, HeaderComment, LineSeparator};
use crate::rule::trim_lines;

/// A line break followed by an optional ` * ` continuation marker.
static CONTINUATION: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\r?\n(?: ?\* ?)?").expect("continuation regex must compile"));

/// C-style block comments:
///
/// ```text
/// /*
///  * Copyright 2024 Yumi Project
///  */
/// ```
///
/// Doc comments opening with `/**` are never read as headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockComment;

impl HeaderComment for BlockComment {
  fn name(&self) -> &'static str {
    "block"
  }

  fn read_header_comment(&self, source: &str) -> CommentBlock {
    let separator = LineSeparator::detect(source);
    let start = source.len() - source.trim_start().len();
    let rest = &source[start..];

    if !rest.starts_with("/*") || rest[2..].starts_with('*') {
      return CommentBlock::none(separator);
    }

    let body_start = start + 2;
    let (body, end) = match source[body_start..].find("*/") {
      Some(offset) => (&source[body_start..body_start + offset], body_start + offset + 2),
      // Unterminated, the comment runs up to the end of the file.
      None => (&source[body_start..], source.len()),
    };

    let mut lines: Vec<String> = CONTINUATION.split(body).map(str::to_string).collect();
    if let Some(first) = lines.first_mut() {
      *first = first.trim_start().to_string();
    }
    // Only the space in front of `*/` belongs to the comment syntax.
    if let Some(last) = lines.last_mut()
      && let Some(stripped) = last.strip_suffix(' ')
    {
      *last = stripped.to_string();
    }
    trim_lines(&mut lines, |line| line.trim().is_empty());

    CommentBlock {
      start,
      end,
      existing: (!lines.is_empty()).then_some(lines),
      separator,
    }
  }

  fn write_header_comment(&self, lines: &[String], separator: LineSeparator) -> String {
    let separator = separator.as_str();
    let mut comment = String::from("/*");
    comment.push_str(separator);

    for line in lines {
      if line.trim().is_empty() {
        comment.push_str(" *");
      } else {
        comment.push_str(" * ");
        comment.push_str(line);
      }
      comment.push_str(separator);
    }

    comment.push_str(" */");
    comment
  }
}
