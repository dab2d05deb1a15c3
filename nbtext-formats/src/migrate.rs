//! Migration of notebook metadata written by older versions
//!
//! The format information used to be stored in flat top-level keys
//! (`nbrmd_formats`, `jupytext_formats`, `jupytext_format_version`,
//! `main_language`, ...) and the metadata filters in a nested
//! `metadata_filter: {notebook: {additional, excluded}, cells: {...}}`
//! dictionary. Everything is now nested under `jupytext`, with filters
//! encoded as comma separated strings (`one,two,-all`).
//!
//! [`migrate`] rewrites the metadata in place and is idempotent: current
//! metadata is left unchanged.

use crate::metadata::{self, scalar_to_string, Metadata, JUPYTEXT, TEXT_REPRESENTATION};
use serde_json::{Map, Value};
use tracing::debug;

/// Cell metadata that is always handled by the text formats themselves
pub const JUPYTEXT_CELL_METADATA: &[&str] = &[
    "skipline",
    "noskipline",
    "cell_marker",
    "lines_to_next_cell",
    "lines_to_end_of_cell_marker",
];

const FLAT_ENTRIES: &[&str] = &["main_language", "encoding", "executable"];
const FILTER_LEVELS: &[(&str, &str)] = &[
    ("notebook", "notebook_metadata_filter"),
    ("cells", "cell_metadata_filter"),
];

/// Rewrite legacy metadata into the current nested schema, in place
pub fn migrate(metadata: &mut Metadata) {
    for legacy in ["nbrmd_formats", "nbrmd_format_version"] {
        if let Some(value) = metadata.remove(legacy) {
            debug!(key = legacy, "migrating legacy nbrmd metadata");
            metadata.insert(legacy.replacen("nbrmd", "jupytext", 1), value);
        }
    }

    let mut block = match metadata.remove(JUPYTEXT) {
        Some(Value::Object(block)) => block,
        None => Map::new(),
        Some(other) => {
            debug!(value = %other, "jupytext metadata is not a mapping, left as is");
            metadata.insert(JUPYTEXT.to_string(), other);
            return;
        }
    };

    if let Some(formats) = metadata.remove("jupytext_formats") {
        debug!("migrating jupytext_formats");
        block.insert(metadata::FORMATS.to_string(), formats);
    }
    if let Some(version) = metadata.remove("jupytext_format_version") {
        debug!("migrating jupytext_format_version");
        text_representation_mut(&mut block).insert("format_version".to_string(), version);
    }
    for entry in FLAT_ENTRIES {
        if let Some(value) = metadata.remove(*entry) {
            block.insert(entry.to_string(), value);
        }
    }

    match block.remove("metadata_filter") {
        Some(Value::Object(filters)) => {
            debug!("migrating metadata_filter");
            for (level, key) in FILTER_LEVELS {
                if let Some(filter) = filters.get(*level) {
                    block.insert(key.to_string(), filter.clone());
                }
            }
        }
        Some(other) => {
            debug!(value = %other, "metadata_filter is not a mapping, left as is");
            block.insert("metadata_filter".to_string(), other);
        }
        None => {}
    }
    for (_, key) in FILTER_LEVELS {
        if let Some(Value::Object(filter)) = block.get(*key) {
            let encoded = encode_filter(filter);
            block.insert(key.to_string(), Value::String(encoded));
        }
    }

    if written_by_version_zero(&block) {
        if let Some(Value::String(formats)) = block.get(metadata::FORMATS) {
            let fixed = formats
                .split(',')
                .map(dot_legacy_suffix)
                .collect::<Vec<_>>()
                .join(",");
            block.insert(metadata::FORMATS.to_string(), Value::String(fixed));
        }
    }

    if !block.is_empty() {
        metadata.insert(JUPYTEXT.to_string(), Value::Object(block));
    }
}

/// Pure variant of [`migrate`]
pub fn migrated(metadata: &Metadata) -> Metadata {
    let mut metadata = metadata.clone();
    migrate(&mut metadata);
    metadata
}

fn text_representation_mut(block: &mut Metadata) -> &mut Metadata {
    let entry = block
        .entry(TEXT_REPRESENTATION)
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    match entry {
        Value::Object(representation) => representation,
        _ => unreachable!("entry was just made a mapping"),
    }
}

/// `{additional: [a, b], excluded: all}` becomes `a,b,-all`
fn encode_filter(filter: &Metadata) -> String {
    let mut entries = Vec::new();

    match filter.get("additional") {
        Some(Value::String(all)) if all == "all" => entries.push("all".to_string()),
        Some(Value::Array(keys)) => entries.extend(
            keys.iter()
                .filter_map(Value::as_str)
                .filter(|key| !JUPYTEXT_CELL_METADATA.contains(key))
                .map(str::to_string),
        ),
        _ => {}
    }

    match filter.get("excluded") {
        Some(Value::String(all)) if all == "all" => entries.push("-all".to_string()),
        Some(Value::Array(keys)) => {
            entries.extend(keys.iter().filter_map(Value::as_str).map(|key| format!("-{key}")))
        }
        _ => {}
    }

    entries.join(",")
}

fn written_by_version_zero(block: &Metadata) -> bool {
    block
        .get(TEXT_REPRESENTATION)
        .and_then(|repr| repr.get("jupytext_version"))
        .and_then(scalar_to_string)
        .is_some_and(|version| version.starts_with("0."))
}

/// Version 0 wrote `pct.py` for what is now `.pct.py`
fn dot_legacy_suffix(format: &str) -> String {
    let has_suffix = format.rfind('.').is_some_and(|pos| pos > 0);
    if has_suffix && !format.starts_with('.') && !format.contains('/') {
        format!(".{format}")
    } else {
        format.to_string()
    }
}
