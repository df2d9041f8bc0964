//! # Comment Module
//!
//! Locating, reading and writing the leading comment block that holds a
//! file's license header.
//!
//! Each comment syntax is a [`HeaderComment`] strategy:
//! - [`BlockComment`] - C-style `/* ... */` comments with ` * ` continuations
//! - [`MarkupComment`] - XML/HTML `<!-- ... -->` comments
//!
//! A [`CommentRegistry`] maps file extensions to the strategy to use.

mod block;
mod markup;

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub use block::BlockComment;
pub use markup::MarkupComment;

/// Extensions handled with block comments by default.
pub const BLOCK_EXTENSIONS: &[&str] = &[
  "c", "cpp", "cxx", "h", "hpp", "hxx", "java", "kt", "kts", "scala", "groovy", "js", "ts", "css", "scss",
];

/// Extensions handled with markup comments by default.
pub const MARKUP_EXTENSIONS: &[&str] = &["xml", "html", "htm", "xhtml", "fxml", "svg"];

/// The line separator used by a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineSeparator {
  #[default]
  Lf,
  CrLf,
}

impl LineSeparator {
  /// Detects the separator from the first line break of `source`.
  ///
  /// Sources without any line break get the default.
  pub fn detect(source: &str) -> Self {
    match source.find('\n') {
      Some(index) if index > 0 && source.as_bytes()[index - 1] == b'\r' => Self::CrLf,
      _ => Self::Lf,
    }
  }

  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Lf => "\n",
      Self::CrLf => "\r\n",
    }
  }
}

impl fmt::Display for LineSeparator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A header comment located in a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
  /// Byte offset of the comment opener.
  pub start: usize,
  /// Byte offset right after the comment closer.
  pub end: usize,
  /// The comment's lines, without comment markup. `None` when no comment was
  /// found or the comment is blank.
  pub existing: Option<Vec<String>>,
  pub separator: LineSeparator,
}

impl CommentBlock {
  /// A block for a source which has no header comment.
  pub const fn none(separator: LineSeparator) -> Self {
    Self {
      start: 0,
      end: 0,
      existing: None,
      separator,
    }
  }
}

/// A comment syntax able to hold a license header.
pub trait HeaderComment: Send + Sync + fmt::Debug {
  /// Name of the comment style, for diagnostics.
  fn name(&self) -> &'static str;

  /// Finds the leading header comment of `source`.
  ///
  /// Only whitespace may precede the comment.
  fn read_header_comment(&self, source: &str) -> CommentBlock;

  /// Wraps `lines` into a comment, without a trailing separator.
  fn write_header_comment(&self, lines: &[String], separator: LineSeparator) -> String;
}

/// Maps file extensions to header comment strategies.
///
/// Extension sets are expected to be disjoint; lookups return the first
/// registered strategy claiming an extension.
#[derive(Debug, Clone, Default)]
pub struct CommentRegistry {
  entries: Vec<(BTreeSet<String>, Arc<dyn HeaderComment>)>,
}

impl CommentRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// A registry with the builtin extension sets.
  pub fn builtin() -> Self {
    Self::new().with_builtin_defaults()
  }

  /// Adds the builtin extension sets, leaving out extensions already claimed.
  pub fn with_builtin_defaults(mut self) -> Self {
    let block = self.unclaimed(BLOCK_EXTENSIONS);
    let markup = self.unclaimed(MARKUP_EXTENSIONS);
    self.register(block, Arc::new(BlockComment));
    self.register(markup, Arc::new(MarkupComment));
    self
  }

  /// Registers `comment` for `extensions`. Extensions are lowercased and
  /// may be given with or without a leading dot.
  pub fn register<I, S>(&mut self, extensions: I, comment: Arc<dyn HeaderComment>)
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let extensions: BTreeSet<String> = extensions
      .into_iter()
      .map(|extension| normalize_extension(extension.as_ref()))
      .filter(|extension| !extension.is_empty())
      .collect();

    if !extensions.is_empty() {
      self.entries.push((extensions, comment));
    }
  }

  /// The strategy registered for `extension`, ignoring case.
  pub fn find(&self, extension: &str) -> Option<&Arc<dyn HeaderComment>> {
    let extension = normalize_extension(extension);
    self
      .entries
      .iter()
      .find(|(extensions, _)| extensions.contains(&extension))
      .map(|(_, comment)| comment)
  }

  /// The strategy for a file, based on its extension.
  pub fn find_for_path(&self, path: &Path) -> Option<&Arc<dyn HeaderComment>> {
    path.extension().and_then(|extension| extension.to_str()).and_then(|extension| self.find(extension))
  }

  /// Every registered extension, sorted.
  pub fn extensions(&self) -> BTreeSet<&str> {
    self
      .entries
      .iter()
      .flat_map(|(extensions, _)| extensions.iter().map(String::as_str))
      .collect()
  }

  fn unclaimed(&self, extensions: &[&'static str]) -> Vec<&'static str> {
    extensions
      .iter()
      .copied()
      .filter(|extension| self.find(extension).is_none())
      .collect()
  }
}

fn normalize_extension(extension: &str) -> String {
  extension.trim().trim_start_matches('.').to_lowercase()
}
