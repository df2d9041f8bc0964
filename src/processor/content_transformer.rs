//! # Content Transformer Module
//!
//! Splices a freshly written header comment into a file's text, in place of
//! the comment located by a [`HeaderComment`](crate::comment::HeaderComment).

use crate::comment::CommentBlock;

/// Content transformation utilities for header updates.
pub struct ContentTransformer;

impl ContentTransformer {
  /// Replaces the located `block` of `source` with `comment`.
  ///
  /// - Text before the located comment is kept, unless it is only whitespace.
  /// - When no comment was located at all, the header is separated from the
  ///   rest of the file by an empty line.
  pub fn splice(source: &str, block: &CommentBlock, comment: &str) -> String {
    let prefix = &source[..block.start];
    let prefix = if prefix.trim().is_empty() { "" } else { prefix };

    let mut content = String::with_capacity(source.len() + comment.len() + 4);
    content.push_str(prefix);
    content.push_str(comment);

    if block.start == 0 && block.end == 0 {
      content.push_str(block.separator.as_str());
      content.push_str(block.separator.as_str());
    }

    content.push_str(&source[block.end..]);
    content
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::comment::{BlockComment, HeaderComment, LineSeparator, MarkupComment};

  fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(ToString::to_string).collect()
  }

  #[test]
  fn test_splice_into_file_without_header() {
    let source = "package dev.yumi;\n\nclass Test {}\n";
    let block = BlockComment.read_header_comment(source);
    let comment = BlockComment.write_header_comment(&lines(&["Copyright 2024"]), block.separator);

    assert_eq!(
      ContentTransformer::splice(source, &block, &comment),
      "/*\n * Copyright 2024\n */\n\npackage dev.yumi;\n\nclass Test {}\n"
    );
  }

  #[test]
  fn test_splice_replaces_existing_header() {
    let source = "/*\n * Copyright 2021\n */\n\nclass Test {}\n";
    let block = BlockComment.read_header_comment(source);
    let comment = BlockComment.write_header_comment(&lines(&["Copyright 2021, 2024"]), block.separator);

    assert_eq!(
      ContentTransformer::splice(source, &block, &comment),
      "/*\n * Copyright 2021, 2024\n */\n\nclass Test {}\n"
    );
  }

  #[test]
  fn test_splice_drops_blank_prefix() {
    let source = "\r\n\r\n/* Old */\r\nclass Test {}\r\n";
    let block = BlockComment.read_header_comment(source);
    let comment = BlockComment.write_header_comment(&lines(&["New"]), block.separator);

    assert_eq!(
      ContentTransformer::splice(source, &block, &comment),
      "/*\r\n * New\r\n */\r\nclass Test {}\r\n"
    );
  }

  #[test]
  fn test_splice_replaces_blank_comment() {
    let source = "/*\n *\n */\nclass Test {}\n";
    let block = BlockComment.read_header_comment(source);
    assert_eq!(block.existing, None);

    let comment = BlockComment.write_header_comment(&lines(&["New"]), block.separator);
    assert_eq!(
      ContentTransformer::splice(source, &block, &comment),
      "/*\n * New\n */\nclass Test {}\n"
    );
  }

  #[test]
  fn test_splice_keeps_non_blank_prefix() {
    let block = CommentBlock {
      start: 6,
      end: 14,
      existing: Some(lines(&["Old"])),
      separator: LineSeparator::Lf,
    };

    assert_eq!(
      ContentTransformer::splice("#!x\n\n\n<!--\n-->\nrest", &block, "<!--\n\tNew\n-->"),
      "#!x\n\n\n<!--\n\tNew\n-->\nrest"
    );
  }

  #[test]
  fn test_splice_markup() {
    let source = "<project>\n</project>\n";
    let block = MarkupComment.read_header_comment(source);
    let comment = MarkupComment.write_header_comment(&lines(&["Copyright 2024", "", "Yumi"]), block.separator);

    assert_eq!(
      ContentTransformer::splice(source, &block, &comment),
      "<!--\n\tCopyright 2024\n\n\tYumi\n-->\n\n<project>\n</project>\n"
    );
  }
}
