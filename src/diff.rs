//! # Diff Module
//!
//! Renders the changes a header update would make to a file, so `check
//! --show-diff` can show what `apply` is going to do.

use std::fmt::Write as _;
use std::path::Path;

use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};

/// Prints line diffs of header updates to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffManager {
  /// Whether to show diffs at all
  pub show_diff: bool,
}

impl DiffManager {
  pub const fn new(show_diff: bool) -> Self {
    Self { show_diff }
  }

  /// Prints the diff between `original` and `new` for `path`, when enabled.
  pub fn display_diff(&self, path: &Path, original: &str, new: &str) {
    if !self.show_diff {
      return;
    }

    let mut output = format!("Diff for {}:\n", path.display());

    for line in render_diff(original, new).lines() {
      let _ = match line.as_bytes().first() {
        Some(b'-') => writeln!(output, "{}", line.if_supports_color(Stream::Stderr, |l| l.red())),
        Some(b'+') => writeln!(output, "{}", line.if_supports_color(Stream::Stderr, |l| l.green())),
        _ => writeln!(output, "{line}"),
      };
    }

    eprintln!("{output}");
  }
}

/// Renders a plain line diff, every line prefixed with `-`, `+` or a space.
pub fn render_diff(original: &str, new: &str) -> String {
  let mut output = String::new();

  for change in TextDiff::from_lines(original, new).iter_all_changes() {
    output.push_str(sign(change.tag()));
    output.push_str(change.value());
    if change.missing_newline() {
      output.push('\n');
    }
  }

  output
}

const fn sign(tag: ChangeTag) -> &'static str {
  match tag {
    ChangeTag::Delete => "-",
    ChangeTag::Insert => "+",
    ChangeTag::Equal => " ",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_render_diff() {
    let original = "/*\n * Copyright 2021 Yumi Project\n */\n\nclass Main {}\n";
    let new = "/*\n * Copyright 2021, 2024 Yumi Project\n */\n\nclass Main {}\n";

    assert_eq!(
      render_diff(original, new),
      " /*\n- * Copyright 2021 Yumi Project\n+ * Copyright 2021, 2024 Yumi Project\n  */\n \n class Main {}\n"
    );
  }

  #[test]
  fn test_render_diff_without_trailing_newline() {
    assert_eq!(render_diff("a", "b"), "-a\n+b\n");
  }

  #[test]
  fn test_render_identical() {
    let text = "line one\nline two\n";
    assert!(!render_diff(text, text).contains(['-', '+']));
  }
}
