use crate::common::fixture;
use nbtext_formats::divine_format;

#[test]
fn test_divine_notebook() {
    assert_eq!(divine_format(&fixture("notebook.ipynb")).unwrap(), "ipynb");
}

#[test]
fn test_divine_from_header() {
    assert_eq!(
        divine_format(&fixture("notebook.md")).unwrap(),
        "md:markdown"
    );
    assert_eq!(
        divine_format(&fixture("percent.ss")).unwrap(),
        "ss:percent"
    );
    assert_eq!(
        divine_format(&fixture("hydrogen.cpp")).unwrap(),
        "cpp:hydrogen"
    );
}

#[test]
fn test_divine_fenced_markdown() {
    assert_eq!(divine_format(&fixture("fenced.md")).unwrap(), "md");
}

#[test]
fn test_divine_defaults_to_python() {
    assert_eq!(divine_format(&fixture("percent.py")).unwrap(), "py:percent");
    assert_eq!(divine_format(&fixture("sphinx.py")).unwrap(), "py:sphinx");
    assert_eq!(divine_format(&fixture("plain.py")).unwrap(), "py:light");
}
