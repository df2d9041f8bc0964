use licenser::license_header::LicenseHeader;
use licenser::rule::HeaderFileContext;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const MPL: &str = "\
Copyright ${YEARS} Yumi Project
#type YEARS YEAR_LIST

#optional
This file is part of Yumi Commons.
#end
This Source Code Form is subject to the terms of the Mozilla Public License.
";

const RANGE: &str = "\
Copyright (c) ${YEARS} Yumi Project
#type YEARS YEAR_LENIENT_RANGE
";

fn lines(text: &str) -> Vec<String> {
  text.lines().map(ToString::to_string).collect()
}

fn join(years: &[i32]) -> String {
  years.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[test]
fn test_first_matching_rule_wins() {
  let header = LicenseHeader::builder()
    .template("MPL", MPL)
    .and_then(|builder| builder.template("RANGE", RANGE))
    .and_then(|builder| builder.build())
    .expect("rules should build");

  let range = lines("Copyright (c) 2019-2022 Yumi Project");
  assert!(header.validate(&range).is_empty());

  let context = HeaderFileContext::new("Main.java", 2019, 2024);
  assert_eq!(
    header.format(&context, Some(range.as_slice())),
    Some(lines("Copyright (c) 2019-2024 Yumi Project"))
  );
}

#[test]
fn test_unmatched_header_is_replaced_by_default_rule() {
  let header = LicenseHeader::builder()
    .template("MPL", MPL)
    .and_then(|builder| builder.template("RANGE", RANGE))
    .and_then(|builder| builder.build())
    .expect("rules should build");

  let existing = lines("All rights reserved.");
  let errors = header.validate(&existing);
  assert_eq!(errors.len(), 2);
  assert_eq!(errors[0].rule, "MPL");
  assert_eq!(errors[1].rule, "RANGE");

  let context = HeaderFileContext::new("Main.java", 2022, 2024);
  let formatted = header.format(&context, Some(existing.as_slice())).expect("header should be replaced");
  assert_eq!(
    formatted,
    lines(
      "Copyright 2022, 2023, 2024 Yumi Project\n\nThis Source Code Form is subject to the terms of the Mozilla Public License."
    )
  );
  assert!(header.validate(&formatted).is_empty());
}

#[test]
fn test_optional_lines_are_kept() {
  let header = LicenseHeader::builder()
    .template("MPL", MPL)
    .and_then(|builder| builder.build())
    .expect("rules should build");

  let existing = lines(
    "Copyright 2020, 2021 Yumi Project\n\nThis file is part of Yumi Commons.\nThis Source Code Form is subject to the terms of the Mozilla Public License.",
  );
  assert!(header.validate(&existing).is_empty());

  let context = HeaderFileContext::new("Main.java", 2020, 2022);
  let formatted = header.format(&context, Some(existing.as_slice())).expect("years should be extended");
  assert_eq!(formatted[0], "Copyright 2020, 2021, 2022 Yumi Project");
  assert_eq!(formatted[2], "This file is part of Yumi Commons.");
}

#[test]
fn test_randomized_year_lists_refresh_and_settle() {
  let header = LicenseHeader::builder()
    .template("MPL", MPL)
    .and_then(|builder| builder.build())
    .expect("rules should build");
  let mut rng = ChaCha8Rng::seed_from_u64(0x11CE_45E5);

  for _ in 0..200 {
    let mut years: Vec<i32> = (0..rng.random_range(1..6)).map(|_| rng.random_range(1990..=2030)).collect();
    years.sort_unstable();
    years.dedup();

    let modified = rng.random_range(1990..=2035);
    let existing = vec![
      format!("Copyright {} Yumi Project", join(&years)),
      String::new(),
      "This Source Code Form is subject to the terms of the Mozilla Public License.".to_string(),
    ];
    assert!(header.validate(&existing).is_empty(), "{existing:?} should be valid");

    let context = HeaderFileContext::new("Main.java", years[0], modified);
    let last = *years.last().expect("at least one year");

    match header.format(&context, Some(existing.as_slice())) {
      None => assert!(modified <= last, "{years:?} should have been extended to {modified}"),
      Some(formatted) => {
        let expected: Vec<i32> = years.iter().copied().chain(last + 1..=modified).collect();
        assert_eq!(formatted[0], format!("Copyright {} Yumi Project", join(&expected)));
        assert!(header.validate(&formatted).is_empty());

        // A refreshed header is stable
        assert_eq!(header.format(&context, Some(formatted.as_slice())), None);
      }
    }
  }
}

#[test]
fn test_randomized_year_ranges_refresh_and_settle() {
  let header = LicenseHeader::builder()
    .template("RANGE", RANGE)
    .and_then(|builder| builder.build())
    .expect("rules should build");
  let mut rng = ChaCha8Rng::seed_from_u64(0x2024);

  for _ in 0..200 {
    let start = rng.random_range(1990..=2030);
    let end = if rng.random_bool(0.5) { start } else { rng.random_range(start + 1..=2031) };
    let modified = rng.random_range(1990..=2035);

    let years = if start == end {
      start.to_string()
    } else {
      format!("{start}-{end}")
    };
    let existing = vec![format!("Copyright (c) {years} Yumi Project")];

    let context = HeaderFileContext::new("Main.java", start, modified);
    let formatted = header
      .format(&context, Some(existing.as_slice()))
      .unwrap_or_else(|| existing.clone());

    let expected = if modified > end {
      format!("Copyright (c) {start}-{modified} Yumi Project")
    } else {
      existing[0].clone()
    };
    assert_eq!(formatted, vec![expected]);
    assert_eq!(header.format(&context, Some(formatted.as_slice())), None);
  }
}
