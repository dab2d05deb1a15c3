//! Format registry for format discovery and selection
//!
//! This module provides the catalog of every text format, one descriptor per
//! (extension, format name) pair. The order of registration is significant:
//! when no format name is requested, the first descriptor registered for an
//! extension is the default one.

use crate::error::{FormatError, Result};
use crate::format::{CellFormat, FormatDescriptor};
use crate::languages::{normalize_extension, SCRIPT_EXTENSIONS};
use once_cell::sync::Lazy;

/// Extension of the JSON notebook format
pub const NOTEBOOK_EXTENSION: &str = ".ipynb";

/// Placeholder extension, resolved from the kernel language at save time
pub const AUTO_EXTENSION: &str = ".auto";

static REGISTRY: Lazy<FormatRegistry> = Lazy::new(FormatRegistry::with_defaults);

/// Registry of text notebook formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::global();
/// assert_eq!(registry.lookup(".py", None)?.name(), "light");
/// assert_eq!(registry.lookup("pct.py", Some("percent"))?.name(), "percent");
/// ```
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: Vec<FormatDescriptor>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: Vec::new(),
        }
    }

    /// The process-wide registry with the built-in formats
    pub fn global() -> &'static FormatRegistry {
        &REGISTRY
    }

    /// Register a format after the existing ones
    pub fn register(&mut self, descriptor: FormatDescriptor) {
        self.formats.push(descriptor);
    }

    /// Find the descriptor for an extension and an optional format name
    ///
    /// The extension is reduced to its final dotted suffix first, so `.pct.py`
    /// resolves like `.py`.
    pub fn lookup(&self, extension: &str, format_name: Option<&str>) -> Result<&FormatDescriptor> {
        let extension = normalize_extension(extension);
        let format_name = format_name.filter(|name| !name.is_empty());

        let mut valid = Vec::new();
        for descriptor in self.formats.iter().filter(|d| d.extension == extension) {
            match format_name {
                Some(name) if descriptor.name() != name => valid.push(descriptor.name().to_string()),
                _ => return Ok(descriptor),
            }
        }

        match format_name {
            Some(name) if !valid.is_empty() => Err(FormatError::UnknownFormatName {
                name: name.to_string(),
                extension,
                valid,
            }),
            _ => Err(FormatError::UnknownExtension(extension)),
        }
    }

    /// Name of the default format for the extension
    pub fn default_format_name(&self, extension: &str) -> Result<&'static str> {
        self.lookup(extension, None).map(FormatDescriptor::name)
    }

    /// All descriptors registered for an extension, in registration order
    pub fn formats_for_extension(&self, extension: &str) -> Vec<&FormatDescriptor> {
        let extension = normalize_extension(extension);
        self.formats
            .iter()
            .filter(|d| d.extension == extension)
            .collect()
    }

    /// The notebook extension followed by every descriptor extension, without duplicates
    pub fn known_extensions(&self) -> Vec<&'static str> {
        let mut extensions = vec![NOTEBOOK_EXTENSION];
        for descriptor in &self.formats {
            if !extensions.contains(&descriptor.extension) {
                extensions.push(descriptor.extension);
            }
        }
        extensions
    }

    /// Whether the extension may appear in a format spec (`.auto` included)
    pub fn is_known_extension(&self, extension: &str) -> bool {
        extension == AUTO_EXTENSION || self.known_extensions().contains(&extension)
    }

    /// List all available format names, without duplicates, in registration order
    pub fn list_formats(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        for descriptor in &self.formats {
            if !names.contains(&descriptor.name()) {
                names.push(descriptor.name());
            }
        }
        names
    }

    /// Iterate over every descriptor in registration order
    pub fn iter(&self) -> impl Iterator<Item = &FormatDescriptor> {
        self.formats.iter()
    }

    /// Detect the default format from a filename, based on its extension
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<&'static str> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?;
        self.default_format_name(extension).ok()
    }

    /// Create a registry with the built-in formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // 1.0 - initial version
        registry.register(FormatDescriptor {
            cell_format: CellFormat::Markdown,
            extension: ".md",
            header_prefix: "",
            current_version: "1.0",
            min_readable_version: None,
        });
        registry.register(FormatDescriptor {
            cell_format: CellFormat::RMarkdown,
            extension: ".Rmd",
            header_prefix: "",
            current_version: "1.0",
            min_readable_version: None,
        });

        for extension in [".r", ".R"] {
            registry.register(FormatDescriptor {
                cell_format: CellFormat::Spin,
                extension,
                header_prefix: "#'",
                current_version: "1.0",
                min_readable_version: None,
            });
        }

        // 1.1 - cells separated with one blank line
        // 1.2 - metadata brackets may be omitted when empty
        // 1.3 - metadata allowed for every cell type
        for lang in SCRIPT_EXTENSIONS {
            registry.register(FormatDescriptor {
                cell_format: CellFormat::Light,
                extension: lang.extension,
                header_prefix: lang.comment,
                current_version: "1.3",
                min_readable_version: Some("1.1"),
            });
        }

        // 1.1 - [markdown] and [raw] cell markers
        // 1.2 - magics commented by default
        for lang in SCRIPT_EXTENSIONS {
            registry.register(FormatDescriptor {
                cell_format: CellFormat::Percent,
                extension: lang.extension,
                header_prefix: lang.comment,
                current_version: "1.2",
                min_readable_version: Some("1.1"),
            });
        }

        for lang in SCRIPT_EXTENSIONS {
            registry.register(FormatDescriptor {
                cell_format: CellFormat::Hydrogen,
                extension: lang.extension,
                header_prefix: lang.comment,
                current_version: "1.2",
                min_readable_version: Some("1.1"),
            });
        }

        registry.register(FormatDescriptor {
            cell_format: CellFormat::Sphinx,
            extension: ".py",
            header_prefix: "#",
            current_version: "1.1",
            min_readable_version: None,
        });

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
