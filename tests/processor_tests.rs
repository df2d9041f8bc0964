mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use common::write_file;
use licenser::license_header::LicenseHeader;
use licenser::processor::{Mode, Processor, ProcessorConfig};
use licenser::report::{FileReport, FileStatus};
use licenser::years::{FixedYear, YearResolver};
use tempfile::TempDir;

const YEARS_HEADER: &str = "\
Copyright ${YEARS} Yumi Project
#type YEARS YEAR_LENIENT_RANGE
";

fn processor(root: &Path, template: &str, mode: Mode, year: i32) -> Result<Processor> {
  let header = LicenseHeader::builder().template("HEADER", template)?.build()?;
  let years = YearResolver::new(root.to_path_buf(), Arc::new(FixedYear(year))).with_project_creation_year(Some(2020));

  Processor::new(ProcessorConfig::new(Arc::new(header), Arc::new(years), mode))
}

fn reports(processor: &Processor) -> Vec<FileReport> {
  let mut reports = processor.file_reports.lock().expect("mutex poisoned").clone();
  reports.sort_by(|a, b| a.path.cmp(&b.path));
  reports
}

#[test]
fn test_apply_preserves_crlf() -> Result<()> {
  let temp_dir = TempDir::new()?;
  let file = write_file(temp_dir.path(), "Main.java", "class Main {\r\n}\r\n")?;

  let processor = processor(temp_dir.path(), YEARS_HEADER, Mode::Apply, 2024)?;
  assert!(!processor.process(&[file.to_string_lossy().into_owned()])?);

  assert_eq!(
    fs::read_to_string(&file)?,
    "/*\r\n * Copyright 2020-2024 Yumi Project\r\n */\r\n\r\nclass Main {\r\n}\r\n"
  );
  Ok(())
}

#[test]
fn test_apply_refreshes_outdated_years() -> Result<()> {
  let temp_dir = TempDir::new()?;
  let java = write_file(
    temp_dir.path(),
    "src/Main.java",
    "/*\n * Copyright 2021-2022 Yumi Project\n */\n\npackage dev.yumi;\n",
  )?;
  let xml = write_file(
    temp_dir.path(),
    "pom.xml",
    "<!--\n\tCopyright 2024 Yumi Project\n-->\n<project/>\n",
  )?;

  let processor = processor(temp_dir.path(), YEARS_HEADER, Mode::Apply, 2024)?;
  processor.process(&[temp_dir.path().to_string_lossy().into_owned()])?;

  assert_eq!(
    fs::read_to_string(&java)?,
    "/*\n * Copyright 2021-2024 Yumi Project\n */\n\npackage dev.yumi;\n"
  );
  assert_eq!(
    fs::read_to_string(&xml)?,
    "<!--\n\tCopyright 2024 Yumi Project\n-->\n<project/>\n"
  );

  let statuses: Vec<FileStatus> = reports(&processor).into_iter().map(|report| report.status).collect();
  assert_eq!(statuses, vec![FileStatus::Unchanged, FileStatus::Updated]);
  Ok(())
}

#[test]
fn test_apply_replaces_invalid_header() -> Result<()> {
  let temp_dir = TempDir::new()?;
  let file = write_file(
    temp_dir.path(),
    "Main.java",
    "/* Proprietary and confidential. */\nclass Main {}\n",
  )?;

  let processor = processor(temp_dir.path(), YEARS_HEADER, Mode::Apply, 2024)?;
  processor.process_files(vec![file.clone()]);

  assert_eq!(
    fs::read_to_string(&file)?,
    "/*\n * Copyright 2020-2024 Yumi Project\n */\nclass Main {}\n"
  );
  Ok(())
}

#[test]
fn test_check_leaves_outdated_years_valid() -> Result<()> {
  let temp_dir = TempDir::new()?;
  let file = write_file(
    temp_dir.path(),
    "Main.java",
    "/*\n * Copyright 2021 Yumi Project\n */\n\nclass Main {}\n",
  )?;

  let processor = processor(temp_dir.path(), YEARS_HEADER, Mode::Check, 2024)?;
  assert!(!processor.process_files(vec![file.clone()]));
  assert_eq!(reports(&processor), vec![FileReport::new(file, FileStatus::Valid)]);
  Ok(())
}

#[test]
fn test_javadoc_is_not_a_header() -> Result<()> {
  let temp_dir = TempDir::new()?;
  let file = write_file(
    temp_dir.path(),
    "Main.java",
    "/**\n * Entry point.\n */\nclass Main {}\n",
  )?;

  let processor = processor(temp_dir.path(), YEARS_HEADER, Mode::Check, 2024)?;
  assert!(processor.process_files(vec![file.clone()]));
  assert_eq!(reports(&processor), vec![FileReport::new(file, FileStatus::Missing)]);
  Ok(())
}
