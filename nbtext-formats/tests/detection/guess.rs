use crate::common::fixture;
use nbtext_formats::{guess_format, read_format_from_metadata};

#[test]
fn test_guess_format_light() {
    assert_eq!(guess_format(&fixture("light.py"), ".py").unwrap(), "light");
    assert_eq!(guess_format(&fixture("plain.py"), ".py").unwrap(), "light");
}

#[test]
fn test_guess_format_percent() {
    assert_eq!(guess_format(&fixture("percent.py"), ".py").unwrap(), "percent");
    assert_eq!(
        guess_format(&fixture("nbconvert.py"), ".py").unwrap(),
        "percent"
    );
}

#[test]
fn test_guess_format_hydrogen() {
    assert_eq!(
        guess_format(&fixture("hydrogen.py"), ".py").unwrap(),
        "hydrogen"
    );
}

#[test]
fn test_guess_format_sphinx() {
    assert_eq!(guess_format(&fixture("sphinx.py"), ".py").unwrap(), "sphinx");
}

#[test]
fn test_guess_format_with_suffixed_extension() {
    assert_eq!(
        guess_format(&fixture("percent.py"), ".pct.py").unwrap(),
        "percent"
    );
}

#[test]
fn test_guess_format_from_header() {
    assert_eq!(
        guess_format(&fixture("notebook.md"), ".md").unwrap(),
        "markdown"
    );
    assert_eq!(guess_format(&fixture("spin.R"), ".R").unwrap(), "spin");
    assert_eq!(
        guess_format(&fixture("hydrogen.cpp"), ".cpp").unwrap(),
        "hydrogen"
    );
    assert_eq!(guess_format(&fixture("legacy.py"), ".py").unwrap(), "percent");
}

#[test]
fn test_read_format_from_metadata_fixtures() {
    assert_eq!(
        read_format_from_metadata(&fixture("legacy.py"), ".py")
            .unwrap()
            .as_deref(),
        Some("percent")
    );
    assert_eq!(
        read_format_from_metadata(&fixture("spin.R"), ".R")
            .unwrap()
            .as_deref(),
        Some("spin")
    );
    assert_eq!(
        read_format_from_metadata(&fixture("percent.py"), ".py").unwrap(),
        None
    );
}
