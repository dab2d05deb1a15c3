//! Format descriptor definition
//!
//! A [`FormatDescriptor`] describes one text syntax for notebooks: the file
//! extension it applies to, the prefix used for the header block, and the
//! version of the representation. The cell readers and exporters themselves
//! live outside this crate; a descriptor only names the pair through its
//! [`CellFormat`] tag so callers can dispatch to them.

use std::fmt;

/// The family of cell reader/exporter a descriptor is paired with.
///
/// Selection happens on this tag rather than through trait objects: every
/// variant names the reader and the exporter that implement it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellFormat {
    Markdown,
    RMarkdown,
    Spin,
    Light,
    Percent,
    Hydrogen,
    Sphinx,
}

impl CellFormat {
    /// The format name used in format specs and metadata
    pub fn name(&self) -> &'static str {
        match self {
            CellFormat::Markdown => "markdown",
            CellFormat::RMarkdown => "rmarkdown",
            CellFormat::Spin => "spin",
            CellFormat::Light => "light",
            CellFormat::Percent => "percent",
            CellFormat::Hydrogen => "hydrogen",
            CellFormat::Sphinx => "sphinx",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CellFormat::Markdown => "Markdown with code fences",
            CellFormat::RMarkdown => "R Markdown with knitr code chunks",
            CellFormat::Spin => "R script with knitr::spin #' comments",
            CellFormat::Light => "Script with cells separated by blank lines",
            CellFormat::Percent => "Script with # %% cell markers",
            CellFormat::Hydrogen => "Percent script with uncommented magics",
            CellFormat::Sphinx => "Sphinx-gallery script",
        }
    }

    /// Name of the cell reader this format is parsed with
    pub fn reader(&self) -> &'static str {
        match self {
            CellFormat::Markdown => "MarkdownCellReader",
            CellFormat::RMarkdown => "RMarkdownCellReader",
            CellFormat::Spin => "RScriptCellReader",
            CellFormat::Light => "LightScriptCellReader",
            CellFormat::Percent => "DoublePercentScriptCellReader",
            CellFormat::Hydrogen => "HydrogenCellReader",
            CellFormat::Sphinx => "SphinxGalleryScriptCellReader",
        }
    }

    /// Name of the cell exporter this format is written with
    pub fn exporter(&self) -> &'static str {
        match self {
            CellFormat::Markdown => "MarkdownCellExporter",
            CellFormat::RMarkdown => "RMarkdownCellExporter",
            CellFormat::Spin => "RScriptCellExporter",
            CellFormat::Light => "LightScriptCellExporter",
            CellFormat::Percent => "DoublePercentCellExporter",
            CellFormat::Hydrogen => "HydrogenCellExporter",
            CellFormat::Sphinx => "SphinxGalleryCellExporter",
        }
    }
}

impl fmt::Display for CellFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Description of one text notebook format for one extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub cell_format: CellFormat,
    /// File extension, with its leading dot
    pub extension: &'static str,
    /// Prefix of the header lines, empty for the markdown flavours
    pub header_prefix: &'static str,
    pub current_version: &'static str,
    /// Oldest version that the current reader still understands
    pub min_readable_version: Option<&'static str>,
}

impl FormatDescriptor {
    pub fn name(&self) -> &'static str {
        self.cell_format.name()
    }

    /// Lower bound of the versions that can be read, the current one when unset
    pub fn min_readable(&self) -> &'static str {
        self.min_readable_version.unwrap_or(self.current_version)
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.extension, self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_readable_defaults_to_current() {
        let descriptor = FormatDescriptor {
            cell_format: CellFormat::Sphinx,
            extension: ".py",
            header_prefix: "#",
            current_version: "1.1",
            min_readable_version: None,
        };
        assert_eq!(descriptor.min_readable(), "1.1");
        assert_eq!(descriptor.to_string(), ".py:sphinx");
    }

    #[test]
    fn test_reader_exporter_pairing() {
        assert_eq!(CellFormat::Percent.reader(), "DoublePercentScriptCellReader");
        assert_eq!(CellFormat::Percent.exporter(), "DoublePercentCellExporter");
        assert_eq!(CellFormat::Spin.name(), "spin");
    }
}
