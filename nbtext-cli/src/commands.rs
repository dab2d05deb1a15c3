//! Command implementations
//!
//! Each command takes the file contents and configuration and returns the
//! text to print. Reading files, printing and exit codes stay in main.rs.

use nbtext_config::NbtextConfig;
use nbtext_formats::header::insert_text_representation;
use nbtext_formats::{
    check_file_version, format_name_for_ext, migrate, parse_many, read_metadata, render_header,
    render_many, FormatRegistry, Metadata,
};
use std::error::Error;
use std::fmt::Write;
use std::path::Path;

pub type CommandResult<T> = Result<T, Box<dyn Error>>;

/// Version recorded as `jupytext_version` in rendered headers
pub const PRODUCER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The extension of a path with its leading dot, `.py` for `nb.pct.py`
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

/// One line per registered format
pub fn list_formats() -> String {
    let mut out = String::from("Available formats:\n\n");
    for descriptor in FormatRegistry::global().iter() {
        let format = descriptor.cell_format;
        let _ = writeln!(
            out,
            "  {:<6} {:<10} {:<5} {}",
            descriptor.extension,
            descriptor.name(),
            descriptor.current_version,
            format.description()
        );
    }
    out
}

/// Normalize a short-form format list, or expand it to its long form as JSON
pub fn formats(spec: &str, long: bool) -> CommandResult<String> {
    let specs = parse_many(spec)?;
    if long {
        return Ok(serde_json::to_string_pretty(&specs)?);
    }
    Ok(render_many(&specs))
}

fn migrated_metadata(text: &str, extension: &str) -> CommandResult<Metadata> {
    let mut metadata = read_metadata(text, extension)?;
    migrate(&mut metadata);
    Ok(metadata)
}

/// The header metadata, migrated, as pretty JSON
pub fn metadata_json(text: &str, extension: &str) -> CommandResult<String> {
    let metadata = migrated_metadata(text, extension)?;
    Ok(serde_json::to_string_pretty(&metadata)?)
}

/// The header metadata, migrated and rendered back as a header block
///
/// The block is written for the format the notebook is paired with, falling
/// back to the configured default pairing and then to the extension default.
pub fn metadata_header(text: &str, extension: &str, config: &NbtextConfig) -> CommandResult<String> {
    let mut metadata = migrated_metadata(text, extension)?;
    let format_name = format_name_for_ext(
        &metadata,
        extension,
        config.formats.default_formats(),
        true,
    )?;
    let descriptor = FormatRegistry::global().lookup(extension, format_name.as_deref())?;

    if config.header.insert_jupytext_version {
        insert_text_representation(
            &mut metadata,
            extension,
            Some(descriptor.name()),
            PRODUCER_VERSION,
        )?;
    }

    Ok(render_header(&metadata, descriptor.header_prefix, &[])?.join("\n"))
}

/// Fail when the text notebook at `source` may not overwrite `outputs`
pub fn check_version(
    text: &str,
    source: &Path,
    outputs: &Path,
    config: &NbtextConfig,
) -> CommandResult<()> {
    let extension = extension_of(source).unwrap_or_default();
    let metadata = migrated_metadata(text, &extension)?;
    check_file_version(&metadata, source, outputs, (&config.version).into())?;
    Ok(())
}
