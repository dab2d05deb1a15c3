//! Text representations of Jupyter notebooks
//!
//!     This crate knows which text formats a notebook can be written in, how a notebook declares
//!     the formats it is paired with, and how to recognize the format of a text file. It never
//!     reads or writes cells: readers and exporters are named by the registry, implemented
//!     elsewhere.
//!
//!     This is a pure lib, that is, it powers nbtext-cli but is shell agnostic: no code here
//!     should suppose a shell environment, be it std print, env vars etc.
//!
//!     The file structure :
//!     .
//!     ├── error.rs            # FormatError
//!     ├── format.rs           # CellFormat and FormatDescriptor
//!     ├── registry.rs         # FormatRegistry, the catalog of descriptors
//!     ├── languages.rs        # Comment conventions of the script languages
//!     ├── format_spec.rs      # Short/long form of the `formats` metadata
//!     ├── metadata.rs         # Accessors over the notebook metadata
//!     ├── header.rs           # YAML header of text notebooks
//!     ├── migrate.rs          # Legacy metadata
//!     ├── string_parser.rs    # Quote tracking for the guesser
//!     ├── guess.rs            # guess_format and divine_format
//!     └── version.rs          # Format version compatibility
//!
//! Formats
//!
//!     A format is an (extension, format name) pair. Each extension has a default format, the
//!     first one registered for it:
//!
//!     - markdown (.md) and rmarkdown (.Rmd): code cells are fenced code blocks.
//!     - spin (.R, .r): knitr::spin scripts, markdown in `#'` comments.
//!     - light: scripts with cells separated by blank lines, markdown in comments.
//!     - percent: scripts with `# %%` cell markers, as used by Spyder, VS Code or PyCharm.
//!     - hydrogen: percent scripts where Jupyter magics are left uncommented.
//!     - sphinx: sphinx-gallery scripts, python only.
//!
//! Metadata
//!
//!     The notebook metadata of a text notebook sits in its header, under `jupyter:`. The format
//!     information itself is in the `jupytext` block. Older files stored it in flat keys, see
//!     [migrate()] for how those are brought up to date. Everything that reads a header migrates
//!     the metadata before using it.
//!
//! Detection
//!
//!     A header that names a format always wins. Otherwise scripts are scanned for cell markers
//!     ([guess_format]), and when even the extension is unknown the text is tested against each
//!     comment convention in turn ([divine_format]).
//!
pub mod error;
pub mod format;
pub mod format_spec;
pub mod guess;
pub mod header;
pub mod languages;
pub mod metadata;
pub mod migrate;
pub mod registry;
pub mod string_parser;
pub mod version;

pub use error::{FormatError, Result};
pub use format::{CellFormat, FormatDescriptor};
pub use format_spec::{parse_many, parse_one, render_many, render_one, validate, FormatSpec};
pub use guess::{divine_format, format_name_for_ext, guess_format, read_format_from_metadata};
pub use header::{extract_header, read_metadata, render_header, Header};
pub use metadata::Metadata;
pub use migrate::{migrate, migrated};
pub use registry::FormatRegistry;
pub use version::{check_file_version, check_overwrite_safe, VersionCheck};
