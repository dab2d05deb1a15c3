//! Error types for format operations

use thiserror::Error;

/// Errors that can occur while resolving, validating or detecting text formats
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// No text format is registered for the extension
    #[error("No format associated to extension '{0}'")]
    UnknownExtension(String),

    /// The format name is not valid for the extension
    #[error(
        "Format '{name}' is not associated to extension '{extension}'. Please choose one of: {}.",
        .valid.join(", ")
    )]
    UnknownFormatName {
        name: String,
        extension: String,
        valid: Vec<String>,
    },

    /// Malformed or unvalidated format specification
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// `.auto` was requested but the notebook has no kernel language information
    #[error("No kernel information found, cannot save to .auto extension")]
    UnresolvedAutoExtension,

    /// The stored format version is outside the range that can be safely trusted
    #[error(
        "File {source_file} has format version {version}, but current version for that extension is {current}.\n\
         It would not be safe to override the source of {outputs_file} with that file.\n\
         Please remove one or the other file."
    )]
    VersionConflict {
        source_file: String,
        outputs_file: String,
        version: String,
        current: String,
    },

    /// The header declares an encoding other than utf-8
    #[error("Encodings other than utf-8 are not supported, found '{0}'")]
    UnsupportedEncoding(String),

    /// The header block is not valid YAML
    #[error("Header error: {0}")]
    Header(String),
}

impl From<serde_yaml::Error> for FormatError {
    fn from(err: serde_yaml::Error) -> Self {
        FormatError::Header(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FormatError>;
