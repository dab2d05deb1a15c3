//! Accessors over notebook metadata
//!
//! Notebook metadata is the JSON mapping found in the notebook file. Format
//! information is stored under the `jupytext` key:
//!
//! ```text
//! jupytext:
//!   formats: ipynb,py:percent
//!   text_representation:
//!     extension: .py
//!     format_name: percent
//!     format_version: '1.2'
//!     jupytext_version: 1.0.0
//!   main_language: python
//! ```

use serde_json::{Map, Value};

/// Notebook-level metadata
pub type Metadata = Map<String, Value>;

pub const JUPYTEXT: &str = "jupytext";
pub const TEXT_REPRESENTATION: &str = "text_representation";
pub const FORMATS: &str = "formats";

/// The `jupytext` block, if present and a mapping
pub fn jupytext(metadata: &Metadata) -> Option<&Metadata> {
    metadata.get(JUPYTEXT).and_then(Value::as_object)
}

/// The `jupytext.text_representation` block, if present and a mapping
pub fn text_representation(metadata: &Metadata) -> Option<&Metadata> {
    jupytext(metadata)
        .and_then(|block| block.get(TEXT_REPRESENTATION))
        .and_then(Value::as_object)
}

/// A string entry of `jupytext.text_representation`
///
/// Version numbers written without quotes are read back from YAML as numbers,
/// those are rendered to their textual form.
pub fn text_representation_entry(metadata: &Metadata, key: &str) -> Option<String> {
    text_representation(metadata)
        .and_then(|repr| repr.get(key))
        .and_then(scalar_to_string)
}

/// The raw `jupytext.formats` entry
pub fn formats(metadata: &Metadata) -> Option<&Value> {
    jupytext(metadata).and_then(|block| block.get(FORMATS))
}

/// The `jupytext` block, created when missing or not a mapping
pub fn jupytext_mut(metadata: &mut Metadata) -> &mut Metadata {
    let entry = metadata
        .entry(JUPYTEXT)
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    match entry {
        Value::Object(block) => block,
        _ => unreachable!("entry was just made a mapping"),
    }
}

/// Render a string, number or boolean as text
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
