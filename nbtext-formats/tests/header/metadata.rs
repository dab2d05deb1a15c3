use crate::common::fixture;
use nbtext_formats::header::extract_header;
use nbtext_formats::{check_file_version, migrated, read_metadata, VersionCheck};
use std::path::Path;

#[test]
fn test_legacy_metadata_is_migrated() {
    let metadata = migrated(&read_metadata(&fixture("legacy.py"), ".py").unwrap());
    let json = serde_json::to_string_pretty(&metadata).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "jupytext": {
        "formats": "ipynb,pct.py:percent",
        "text_representation": {
          "format_version": "1.1"
        },
        "main_language": "python"
      }
    }
    "#);
}

#[test]
fn test_spin_front_matter_is_kept_apart() {
    let text = fixture("spin.R");
    let lines: Vec<&str> = text.lines().collect();
    let header = extract_header(&lines, "#'").unwrap();
    assert!(header.had_header);
    assert_eq!(header.other_lines, vec!["title: A spin script"]);
    assert_eq!(header.metadata["jupytext"]["formats"], "ipynb,R:spin");
    assert_eq!(header.body.first(), Some(&"#' Markdown in spin comments"));
}

#[test]
fn test_nbconvert_script_header() {
    let metadata = read_metadata(&fixture("nbconvert.py"), ".py").unwrap();
    assert_eq!(
        metadata["jupytext"]["executable"],
        "/usr/bin/env python"
    );
    assert_eq!(metadata["jupytext"]["encoding"], "# coding: utf-8");
}

#[test]
fn test_fixture_versions_are_readable() {
    for (name, extension) in [
        ("legacy.py", ".py"),
        ("notebook.md", ".md"),
        ("hydrogen.cpp", ".cpp"),
        ("percent.ss", ".ss"),
    ] {
        let metadata = migrated(&read_metadata(&fixture(name), extension).unwrap());
        check_file_version(
            &metadata,
            Path::new(name),
            Path::new("notebook.ipynb"),
            VersionCheck::default(),
        )
        .unwrap_or_else(|e| panic!("{name}: {e}"));
    }
}
