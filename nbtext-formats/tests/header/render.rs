use crate::common::fixture;
use nbtext_formats::header::{extract_header, insert_text_representation, render_header};
use nbtext_formats::read_metadata;

#[test]
fn test_markdown_header_round_trip() {
    let text = fixture("notebook.md");
    let metadata = read_metadata(&text, ".md").unwrap();

    let rendered = render_header(&metadata, "", &[]).unwrap();
    let lines: Vec<&str> = rendered.iter().map(String::as_str).collect();
    let header = extract_header(&lines, "").unwrap();
    assert_eq!(header.metadata, metadata);
}

#[test]
fn test_spin_header_round_trip() {
    let text = fixture("spin.R");
    let lines: Vec<&str> = text.lines().collect();
    let original = extract_header(&lines, "#'").unwrap();

    let rendered = render_header(&original.metadata, "#'", &original.other_lines).unwrap();
    let lines: Vec<&str> = rendered.iter().map(String::as_str).collect();
    let header = extract_header(&lines, "#'").unwrap();
    assert_eq!(header.metadata, original.metadata);
    assert_eq!(header.other_lines, original.other_lines);
}

#[test]
fn test_stamped_header_snapshot() {
    let mut metadata = read_metadata(&fixture("nbconvert.py"), ".py").unwrap();
    insert_text_representation(&mut metadata, ".py", Some("percent"), "1.0.0").unwrap();
    let rendered = render_header(&metadata, "#", &[]).unwrap().join("\n");
    insta::assert_snapshot!(rendered, @r"
    #!/usr/bin/env python
    # coding: utf-8
    # ---
    # jupyter:
    #   jupytext:
    #     text_representation:
    #       extension: .py
    #       format_name: percent
    #       format_version: '1.2'
    #       jupytext_version: 1.0.0
    # ---
    ");
}
