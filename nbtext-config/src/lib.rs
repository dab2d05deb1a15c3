//! Shared configuration loader for the nbtext toolchain.
//!
//! `defaults/nbtext.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`NbtextConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use nbtext_formats::VersionCheck;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/nbtext.default.toml");

/// Top-level configuration consumed by nbtext applications.
#[derive(Debug, Clone, Deserialize)]
pub struct NbtextConfig {
    pub formats: FormatsConfig,
    pub version: VersionConfig,
    pub header: HeaderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormatsConfig {
    /// Short-form pairing for notebooks that declare none, empty for none
    pub default_formats: String,
}

impl FormatsConfig {
    /// The default pairing, `None` when unset
    pub fn default_formats(&self) -> Option<&str> {
        Some(self.default_formats.trim()).filter(|formats| !formats.is_empty())
    }
}

/// Format version checks on text notebooks.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionConfig {
    pub check: bool,
}

impl From<&VersionConfig> for VersionCheck {
    fn from(config: &VersionConfig) -> Self {
        VersionCheck {
            enabled: config.check,
        }
    }
}

impl From<VersionConfig> for VersionCheck {
    fn from(config: VersionConfig) -> Self {
        VersionCheck::from(&config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeaderConfig {
    pub insert_jupytext_version: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<NbtextConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<NbtextConfig, ConfigError> {
    Loader::new().build()
}
