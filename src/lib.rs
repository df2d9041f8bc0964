//! # licenser
//!
//! A tool that keeps license header comments consistent across a codebase.
//!
//! Headers are described by small templates. A template is plain text with
//! `${VARIABLE}` placeholders, optional lines and `#type` / `#year_selection`
//! directives. `licenser` checks that the leading comment of each file
//! matches one of the accepted templates, and can rewrite headers that are
//! missing or outdated, refreshing years and file names on the way.
//!
//! ## Features
//!
//! * Several accepted templates per project, the first one being the default
//! * Typed variables: creation years, file names, year ranges and year lists
//! * Years tracked per project or per file, from git history
//! * C-style `/* */` and markup `<!-- -->` comments, mapped by file extension
//! * Check mode for CI, with diffs and JSON reports
//!
//! ## Usage as a Library
//!
//! ```rust
//! use licenser::license_header::LicenseHeader;
//! use licenser::rule::HeaderFileContext;
//!
//! fn main() -> anyhow::Result<()> {
//!     let header = LicenseHeader::builder()
//!         .template(
//!             "HEADER",
//!             "Copyright ${YEARS} Yumi Project\n#type YEARS YEAR_LENIENT_RANGE\n",
//!         )?
//!         .build()?;
//!
//!     // An existing header is accepted by the rule...
//!     assert!(header.validate(&["Copyright 2021-2023 Yumi Project"]).is_empty());
//!
//!     // ...and refreshed when its years are outdated.
//!     let existing = vec!["Copyright 2021-2023 Yumi Project".to_string()];
//!     let context = HeaderFileContext::new("Main.java", 2021, 2024);
//!     let updated = header.format(&context, Some(existing.as_slice()));
//!     assert_eq!(updated, Some(vec!["Copyright 2021-2024 Yumi Project".to_string()]));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`rule`] - Header templates: parsing, matching and rendering
//! * [`license_header`] - The set of rules a project accepts
//! * [`comment`] - Reading and writing header comments
//! * [`processor`] - Checking and applying headers to files
//! * [`logging`] - Logging utilities for verbose output

pub mod cli;
pub mod comment;
pub mod config;
pub mod diff;
pub mod error;
pub mod git;
pub mod license_header;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod rule;
pub mod years;
