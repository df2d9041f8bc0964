//! # Variable Types
//!
//! Typed variables usable in header templates. Each type knows how to read a
//! value out of an existing header line, how to print it back, and how to bring
//! it up to date for a given file.
//!
//! The four builtin types are:
//!
//! | Type                 | Example            | Refresh                                          |
//! |----------------------|--------------------|--------------------------------------------------|
//! | `CREATION_YEAR`      | `2021`             | keeps the existing year, else the creation year  |
//! | `FILE_NAME`          | `main.c`           | always the current file name                     |
//! | `YEAR_LENIENT_RANGE` | `2021-2023`        | raises the upper bound to the last modified year |
//! | `YEAR_LIST`          | `2019, 2021, 2022` | appends years after the last one listed          |
//!
//! Implementors write against the typed [`VariableType`] trait; rules store
//! them as [`DynVariableType`] trait objects, which exchange values through the
//! closed [`VariableValue`] enum.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, LazyLock};

use super::HeaderFileContext;

/// Name of the variable which always holds the creation year.
pub const CREATION_YEAR_VAR_NAME: &str = "CREATION_YEAR";

/// Name of the variable which always holds the file name.
pub const FILE_NAME_VAR_NAME: &str = "FILE_NAME";

/// A year, or an inclusive span of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearRange {
  Single(i32),
  Span(i32, i32),
}

impl YearRange {
  pub const fn start(&self) -> i32 {
    match self {
      Self::Single(year) | Self::Span(year, _) => *year,
    }
  }

  pub const fn end(&self) -> i32 {
    match self {
      Self::Single(year) | Self::Span(_, year) => *year,
    }
  }
}

impl fmt::Display for YearRange {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Single(year) => write!(f, "{year}"),
      Self::Span(start, end) => write!(f, "{start}-{end}"),
    }
  }
}

/// A variable value, whatever its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableValue {
  Year(i32),
  Text(String),
  Range(YearRange),
  Years(Vec<i32>),
}

impl fmt::Display for VariableValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Year(year) => write!(f, "{year}"),
      Self::Text(text) => f.write_str(text),
      Self::Range(range) => write!(f, "{range}"),
      Self::Years(years) => f.write_str(&join_years(years)),
    }
  }
}

macro_rules! variable_value_conversions {
  ($($ty:ty => $variant:ident),* $(,)?) => {
    $(
      impl From<$ty> for VariableValue {
        fn from(value: $ty) -> Self {
          Self::$variant(value)
        }
      }

      impl TryFrom<VariableValue> for $ty {
        type Error = VariableValue;

        fn try_from(value: VariableValue) -> Result<Self, Self::Error> {
          match value {
            VariableValue::$variant(inner) => Ok(inner),
            other => Err(other),
          }
        }
      }
    )*
  };
}

variable_value_conversions! {
  i32 => Year,
  String => Text,
  YearRange => Range,
  Vec<i32> => Years,
}

/// The outcome of reading a variable value out of a header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult<D> {
  /// The parsed value.
  pub value: D,
  /// Byte offset right after the value in the input.
  pub end: usize,
}

impl<D> ParseResult<D> {
  pub const fn new(value: D, end: usize) -> Self {
    Self { value, end }
  }
}

/// A typed variable type.
pub trait VariableType: Send + Sync + fmt::Debug {
  /// The data type held by variables of this type.
  type Value: Clone + PartialEq + Into<VariableValue> + TryFrom<VariableValue>;

  /// The name under which the type is referenced by `#type` directives.
  fn name(&self) -> &'static str;

  /// Reads a value from `input` starting at byte offset `start`.
  ///
  /// Returns `None` when no value of this type starts there.
  fn parse_var(&self, input: &str, start: usize) -> Option<ParseResult<Self::Value>>;

  /// Prints a value the way it should appear in a header.
  fn format_value(&self, value: &Self::Value) -> String;

  /// Computes the up-to-date value for the file described by `context`.
  ///
  /// `previous` is the value found in the existing header, if any.
  fn refresh(&self, context: &HeaderFileContext, previous: Option<Self::Value>) -> Self::Value;
}

/// Object-safe view of a [`VariableType`], as stored by header rules.
pub trait DynVariableType: Send + Sync + fmt::Debug {
  fn type_name(&self) -> &'static str;

  fn parse_dyn(&self, input: &str, start: usize) -> Option<ParseResult<VariableValue>>;

  fn format_dyn(&self, value: &VariableValue) -> String;

  fn refresh_dyn(&self, context: &HeaderFileContext, previous: Option<&VariableValue>) -> VariableValue;
}

impl<T: VariableType> DynVariableType for T {
  fn type_name(&self) -> &'static str {
    self.name()
  }

  fn parse_dyn(&self, input: &str, start: usize) -> Option<ParseResult<VariableValue>> {
    self
      .parse_var(input, start)
      .map(|result| ParseResult::new(result.value.into(), result.end))
  }

  fn format_dyn(&self, value: &VariableValue) -> String {
    match T::Value::try_from(value.clone()) {
      Ok(typed) => self.format_value(&typed),
      Err(_) => value.to_string(),
    }
  }

  fn refresh_dyn(&self, context: &HeaderFileContext, previous: Option<&VariableValue>) -> VariableValue {
    // A value of another type cannot come from this variable, treat it as unknown.
    let previous = previous.and_then(|value| T::Value::try_from(value.clone()).ok());
    self.refresh(context, previous).into()
  }
}

/// Returns the end offset of the run of ASCII digits starting at `start`.
fn find_integer(input: &str, start: usize) -> Option<usize> {
  let bytes = input.as_bytes().get(start..)?;
  let len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
  (len > 0).then_some(start + len)
}

fn parse_year(input: &str, start: usize) -> Option<(i32, usize)> {
  let end = find_integer(input, start)?;
  let year = input[start..end].parse().ok()?;
  Some((year, end))
}

fn join_years(years: &[i32]) -> String {
  years.iter().map(i32::to_string).collect::<Vec<_>>().join(", ")
}

/// The year the project or file was created. Once written, it never changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreationYear;

impl VariableType for CreationYear {
  type Value = i32;

  fn name(&self) -> &'static str {
    "CREATION_YEAR"
  }

  fn parse_var(&self, input: &str, start: usize) -> Option<ParseResult<i32>> {
    parse_year(input, start).map(|(year, end)| ParseResult::new(year, end))
  }

  fn format_value(&self, value: &i32) -> String {
    value.to_string()
  }

  fn refresh(&self, context: &HeaderFileContext, previous: Option<i32>) -> i32 {
    previous.unwrap_or(context.creation_year)
  }
}

/// The name of the file the header belongs to.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileName;

impl VariableType for FileName {
  type Value = String;

  fn name(&self) -> &'static str {
    "FILE_NAME"
  }

  fn parse_var(&self, input: &str, start: usize) -> Option<ParseResult<String>> {
    let rest = input.get(start..)?;
    let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
    (len > 0).then(|| ParseResult::new(rest[..len].to_string(), start + len))
  }

  fn format_value(&self, value: &String) -> String {
    value.clone()
  }

  // Renamed or copied files get their header resynced on every run.
  fn refresh(&self, context: &HeaderFileContext, _previous: Option<String>) -> String {
    context.file_name.clone()
  }
}

/// A single year or a `start-end` span, whose end follows the last modification.
#[derive(Debug, Clone, Copy, Default)]
pub struct YearLenientRange;

impl VariableType for YearLenientRange {
  type Value = YearRange;

  fn name(&self) -> &'static str {
    "YEAR_LENIENT_RANGE"
  }

  fn parse_var(&self, input: &str, start: usize) -> Option<ParseResult<YearRange>> {
    let (first, first_end) = parse_year(input, start)?;

    if input.as_bytes().get(first_end) == Some(&b'-')
      && let Some((second, second_end)) = parse_year(input, first_end + 1)
    {
      return Some(ParseResult::new(YearRange::Span(first, second), second_end));
    }

    Some(ParseResult::new(YearRange::Single(first), first_end))
  }

  fn format_value(&self, value: &YearRange) -> String {
    value.to_string()
  }

  fn refresh(&self, context: &HeaderFileContext, previous: Option<YearRange>) -> YearRange {
    let modified = context.last_modified_year;

    match previous {
      None if context.creation_year == modified => YearRange::Single(modified),
      None => YearRange::Span(context.creation_year, modified),
      Some(YearRange::Single(year)) if year < modified => YearRange::Span(year, modified),
      Some(YearRange::Span(start, end)) if end < modified => YearRange::Span(start, modified),
      Some(range) => range,
    }
  }
}

/// A comma separated list of years, e.g. `2019, 2021, 2022`.
#[derive(Debug, Clone, Copy, Default)]
pub struct YearList;

impl VariableType for YearList {
  type Value = Vec<i32>;

  fn name(&self) -> &'static str {
    "YEAR_LIST"
  }

  fn parse_var(&self, input: &str, start: usize) -> Option<ParseResult<Vec<i32>>> {
    let (first, mut end) = parse_year(input, start)?;
    let mut years = vec![first];

    while input.get(end..).is_some_and(|rest| rest.starts_with(", ")) {
      let Some((year, year_end)) = parse_year(input, end + 2) else {
        break;
      };
      years.push(year);
      end = year_end;
    }

    years.sort_unstable();
    years.dedup();

    Some(ParseResult::new(years, end))
  }

  fn format_value(&self, value: &Vec<i32>) -> String {
    join_years(value)
  }

  fn refresh(&self, context: &HeaderFileContext, previous: Option<Vec<i32>>) -> Vec<i32> {
    let modified = context.last_modified_year;

    match previous.filter(|years| !years.is_empty()) {
      Some(mut years) => {
        let last_known = years.iter().copied().max().unwrap_or(modified);
        // Gaps between existing years were curated by hand, only extend past the end.
        if let Some(next) = last_known.checked_add(1) {
          years.extend(next..=modified);
        }
        years.sort_unstable();
        years.dedup();
        years
      }
      None => (context.creation_year..=modified.max(context.creation_year)).collect(),
    }
  }
}

/// Lookup table from type name to variable type implementation.
///
/// Populated during configuration; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
  types: HashMap<String, Arc<dyn DynVariableType>>,
}

static BUILTIN_REGISTRY: LazyLock<VariableRegistry> = LazyLock::new(|| {
  let mut registry = VariableRegistry::default();
  registry.register(Arc::new(CreationYear));
  registry.register(Arc::new(FileName));
  registry.register(Arc::new(YearLenientRange));
  registry.register(Arc::new(YearList));
  registry
});

impl VariableRegistry {
  /// The registry holding the four builtin types.
  pub fn builtin() -> &'static Self {
    &BUILTIN_REGISTRY
  }

  /// Registers a variable type under its own name, replacing any previous one.
  pub fn register(&mut self, variable_type: Arc<dyn DynVariableType>) {
    self
      .types
      .insert(variable_type.type_name().to_string(), variable_type);
  }

  pub fn get(&self, name: &str) -> Option<Arc<dyn DynVariableType>> {
    self.types.get(name).cloned()
  }

  /// Names of all registered types, sorted.
  pub fn names(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }
}

/// The variables every rule declares implicitly.
pub fn default_variables() -> BTreeMap<String, Arc<dyn DynVariableType>> {
  BTreeMap::from([
    (
      CREATION_YEAR_VAR_NAME.to_string(),
      Arc::new(CreationYear) as Arc<dyn DynVariableType>,
    ),
    (
      FILE_NAME_VAR_NAME.to_string(),
      Arc::new(FileName) as Arc<dyn DynVariableType>,
    ),
  ])
}
