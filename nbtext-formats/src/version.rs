//! Format version compatibility
//!
//! Text notebooks record the version of the format they were written in
//! (`jupytext.text_representation.format_version`). A file written in a
//! version the current reader does not understand must not overwrite the
//! inputs of the paired notebook.

use crate::error::{FormatError, Result};
use crate::format::FormatDescriptor;
use crate::guess::format_name_for_ext;
use crate::metadata::{self, Metadata};
use crate::registry::{FormatRegistry, NOTEBOOK_EXTENSION};
use std::cmp::Ordering;
use std::path::Path;
use tracing::debug;

/// Whether format versions are written to and checked in text notebooks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionCheck {
    pub enabled: bool,
}

impl VersionCheck {
    pub fn disabled() -> Self {
        VersionCheck { enabled: false }
    }
}

impl Default for VersionCheck {
    fn default() -> Self {
        VersionCheck { enabled: true }
    }
}

/// Compare dotted versions component by component (`1.10` > `1.9`)
///
/// Versions with a non numeric component are compared as strings.
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    fn components(version: &str) -> Option<Vec<u64>> {
        version.split('.').map(|part| part.parse().ok()).collect()
    }

    match (components(left), components(right)) {
        (Some(left), Some(right)) => left.cmp(&right),
        _ => left.cmp(right),
    }
}

/// Fail unless a file in format version `stored` can be trusted by the
/// reader of `descriptor`
///
/// A notebook with metadata but no stored version is assumed to be in the
/// current version. Without metadata at all there is nothing to check.
pub fn check_overwrite_safe(
    stored: Option<&str>,
    has_metadata: bool,
    descriptor: &FormatDescriptor,
    source_file: &str,
    outputs_file: &str,
) -> Result<()> {
    let current = descriptor.current_version;
    let version = match stored.filter(|version| !version.is_empty()) {
        Some(version) => version,
        None if has_metadata => current,
        None => return Ok(()),
    };

    if version == current {
        return Ok(());
    }

    let readable = compare_versions(descriptor.min_readable(), version) != Ordering::Greater
        && compare_versions(version, current) != Ordering::Greater;
    if readable {
        return Ok(());
    }

    debug!(%descriptor, version, current, "format version not readable");
    Err(FormatError::VersionConflict {
        source_file: source_file.to_string(),
        outputs_file: outputs_file.to_string(),
        version: version.to_string(),
        current: current.to_string(),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Check that the text notebook at `source_path` can safely overwrite the
/// inputs of the notebook at `outputs_path`
///
/// Nothing is checked for `.ipynb` sources, or when the check is disabled.
pub fn check_file_version(
    metadata: &Metadata,
    source_path: &Path,
    outputs_path: &Path,
    check: VersionCheck,
) -> Result<()> {
    if !check.enabled {
        return Ok(());
    }

    let extension = source_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .ok_or_else(|| FormatError::UnknownExtension(source_path.display().to_string()))?;
    if extension == NOTEBOOK_EXTENSION {
        return Ok(());
    }

    let stored = metadata::text_representation_entry(metadata, "format_version");
    let format_name = format_name_for_ext(metadata, &extension, None, true)?;
    let descriptor = FormatRegistry::global().lookup(&extension, format_name.as_deref())?;

    check_overwrite_safe(
        stored.as_deref(),
        !metadata.is_empty(),
        descriptor,
        &file_name(source_path),
        &file_name(outputs_path),
    )
}
