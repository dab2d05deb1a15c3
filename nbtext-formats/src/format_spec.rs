//! Format specifications and their short/long encodings
//!
//! A format spec describes one target of a (possibly multi-target) save
//! configuration. It is written in the notebook metadata in its short form,
//!
//! ```text
//! [prefix/][suffix.]extension[:format_name]
//! ```
//!
//! with several targets joined by commas (`ipynb,nb/py:percent,.lgt.py:light`).
//! The long form is the [`FormatSpec`] record. [`parse_many`] and
//! [`render_many`] are inverse of each other on the path and format name
//! fields; the remaining options only exist in the long form.

use crate::error::{FormatError, Result};
use crate::metadata::{self, Metadata};
use crate::registry::{FormatRegistry, AUTO_EXTENSION};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys allowed in the long form of a format spec
pub const VALID_FORMAT_OPTIONS: &[&str] = &[
    "extension",
    "format_name",
    "suffix",
    "prefix",
    "comment_magics",
    "split_at_heading",
    "notebook_metadata_filter",
    "cell_metadata_filter",
];

/// Options that only accept a boolean value
pub const BINARY_FORMAT_OPTIONS: &[&str] = &["comment_magics", "split_at_heading"];

/// Long form of a format spec
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatSpec {
    /// Extension with its leading dot, empty when unset
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_magics: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_at_heading: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook_metadata_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_metadata_filter: Option<String>,
}

impl FormatSpec {
    /// A spec for a bare extension (a missing leading dot is added)
    pub fn with_extension(extension: &str) -> Self {
        FormatSpec {
            extension: dotted(extension),
            ..Default::default()
        }
    }

    /// Builder-style setter for the format name
    pub fn format_name(mut self, name: impl Into<String>) -> Self {
        self.format_name = Some(name.into());
        self
    }

    /// Builder-style setter for the suffix
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Builder-style setter for the prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Whether nothing at all is specified
    pub fn is_empty(&self) -> bool {
        *self == FormatSpec::default()
    }

    /// The format name, when one is set and not empty
    pub fn name(&self) -> Option<&str> {
        self.format_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Whether both specs designate the same file (same extension, prefix and suffix)
    pub fn identical_path(&self, other: &FormatSpec) -> bool {
        self.extension == other.extension
            && self.prefix == other.prefix
            && self.suffix == other.suffix
    }
}

fn dotted(extension: &str) -> String {
    if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}

/// Parse one short-form spec: `nb/sfx.py:percent` becomes
/// `{prefix: nb, suffix: sfx, extension: .py, format_name: percent}`.
///
/// An empty string yields an empty spec.
pub fn parse_one(text: &str) -> FormatSpec {
    let mut spec = FormatSpec::default();
    if text.is_empty() {
        return spec;
    }

    let mut rest = text;
    if let Some(pos) = rest.rfind('/').filter(|pos| *pos > 0) {
        spec.prefix = Some(rest[..pos].to_string());
        rest = &rest[pos + 1..];
    }

    if let Some(pos) = rest.rfind(':') {
        spec.format_name = Some(rest[pos + 1..].to_string());
        rest = &rest[..pos];
    }

    if let Some(pos) = rest.rfind('.').filter(|pos| *pos > 0) {
        spec.suffix = Some(rest[..pos].to_string());
        rest = &rest[pos..];
    }

    spec.extension = dotted(rest);
    spec
}

/// Parse one spec given either in short form (a string) or long form (a record)
///
/// Records are only decoded, their option keys and types checked. The
/// extension is left for [`validate`], as for strings.
pub fn parse_one_value(value: &Value) -> Result<FormatSpec> {
    match value {
        Value::String(text) => Ok(parse_one(text)),
        Value::Object(_) => decode_record(value),
        other => Err(FormatError::InvalidFormat(format!(
            "Format should be a string or a dictionary, not '{other}'"
        ))),
    }
}

/// Parse a comma-separated list of short-form specs and validate every entry
///
/// Empty entries are skipped. Validation is all-or-nothing: the first invalid
/// entry is reported and no spec is returned.
pub fn parse_many(text: &str) -> Result<Vec<FormatSpec>> {
    let specs: Vec<FormatSpec> = text
        .split(',')
        .filter(|token| !token.is_empty())
        .map(parse_one)
        .collect();
    validate_all(&specs)?;
    Ok(specs)
}

/// Like [`parse_many`], for a metadata value: a comma-separated string or a
/// list of short- and long-form specs. A missing value (`null`) is no spec.
pub fn parse_many_value(value: &Value) -> Result<Vec<FormatSpec>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(text) => parse_many(text),
        Value::Array(entries) => {
            let specs = entries
                .iter()
                .map(parse_one_value)
                .collect::<Result<Vec<_>>>()?;
            validate_all(&specs)?;
            Ok(specs)
        }
        other => Err(FormatError::InvalidFormat(format!(
            "Formats should be a string or a list, not '{other}'"
        ))),
    }
}

/// Render one spec in short form
pub fn render_one(spec: &FormatSpec) -> String {
    let mut text = match spec.suffix.as_deref().filter(|suffix| !suffix.is_empty()) {
        Some(suffix) => format!("{suffix}{}", spec.extension),
        None => spec
            .extension
            .strip_prefix('.')
            .unwrap_or(spec.extension.as_str())
            .to_string(),
    };

    if let Some(prefix) = &spec.prefix {
        text = format!("{prefix}/{text}");
    }

    if let Some(name) = spec.name() {
        if !matches!(spec.extension.as_str(), ".md" | ".Rmd") {
            text.push(':');
            text.push_str(name);
        }
    }

    text
}

/// Render a list of specs in short form, joined with commas
pub fn render_many(specs: &[FormatSpec]) -> String {
    specs.iter().map(render_one).collect::<Vec<_>>().join(",")
}

/// Check that the extension of a spec is a notebook extension (or `.auto`)
pub fn validate(spec: &FormatSpec) -> Result<()> {
    if spec.extension.is_empty() {
        return Err(FormatError::InvalidFormat(
            "Missing format extension".to_string(),
        ));
    }

    let registry = FormatRegistry::global();
    if !registry.is_known_extension(&spec.extension) {
        let mut valid = registry.known_extensions();
        valid.push(AUTO_EXTENSION);
        return Err(FormatError::InvalidFormat(format!(
            "Extension '{}' is not a notebook extension. Please use one of '{}'.",
            spec.extension,
            valid.join("', '")
        )));
    }

    Ok(())
}

fn validate_all(specs: &[FormatSpec]) -> Result<()> {
    specs.iter().try_for_each(validate)
}

/// Validate a long-form spec given as an untyped record, and convert it
pub fn validate_value(value: &Value) -> Result<FormatSpec> {
    let spec = decode_record(value)?;
    validate(&spec)?;
    Ok(spec)
}

fn decode_record(value: &Value) -> Result<FormatSpec> {
    let Value::Object(record) = value else {
        return Err(FormatError::InvalidFormat(
            "Format should be a dictionary".to_string(),
        ));
    };

    for (key, option) in record {
        if !VALID_FORMAT_OPTIONS.contains(&key.as_str()) {
            return Err(FormatError::InvalidFormat(format!(
                "Unknown format option '{key}' - should be one of '{}'",
                VALID_FORMAT_OPTIONS.join("', '")
            )));
        }
        if BINARY_FORMAT_OPTIONS.contains(&key.as_str()) && !option.is_boolean() {
            return Err(FormatError::InvalidFormat(format!(
                "Format option '{key}' should be a bool, not '{option}'"
            )));
        }
    }

    serde_json::from_value(value.clone()).map_err(|err| FormatError::InvalidFormat(err.to_string()))
}

/// Script extension of the notebook kernel, from `language_info.file_extension`
pub fn auto_ext_from_metadata(metadata: &Metadata) -> Option<String> {
    let extension = metadata
        .get("language_info")
        .and_then(|info| info.get("file_extension"))
        .and_then(Value::as_str)?;
    if extension == ".r" {
        return Some(".R".to_string());
    }
    Some(extension.to_string())
}

/// Parse the formats and replace the `.auto` extension with the kernel's one
pub fn resolve_auto_extension(formats: &Value, metadata: &Metadata) -> Result<Vec<FormatSpec>> {
    let mut specs = parse_many_value(formats)?;
    let auto_ext = auto_ext_from_metadata(metadata);

    for spec in specs.iter_mut().filter(|spec| spec.extension == AUTO_EXTENSION) {
        match &auto_ext {
            Some(extension) => spec.extension = extension.clone(),
            None => return Err(FormatError::UnresolvedAutoExtension),
        }
    }

    Ok(specs)
}

/// Record the format name of `new_format` in the matching entry of
/// `jupytext.formats`. Notebooks without a `formats` entry are left untouched.
pub fn update_formats_metadata(metadata: &mut Metadata, new_format: &FormatSpec) -> Result<()> {
    let mut specs = match metadata::formats(metadata) {
        Some(formats) => parse_many_value(formats)?,
        None => return Ok(()),
    };
    if specs.is_empty() {
        return Ok(());
    }

    if let Some(spec) = specs.iter_mut().find(|spec| spec.identical_path(new_format)) {
        spec.format_name = new_format.format_name.clone();
    }

    metadata::jupytext_mut(metadata).insert(
        metadata::FORMATS.to_string(),
        Value::String(render_many(&specs)),
    );
    Ok(())
}
