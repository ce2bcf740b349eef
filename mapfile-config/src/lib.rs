//! Shared configuration loader for the mapfile engine.
//!
//! `defaults/mapfile.default.toml` is embedded into every binary so the
//! documented defaults and the runtime behavior stay in sync. Callers layer a
//! user file, the process environment (`MS_MAPFILE_PATTERN`, `MS_MAPFILE`,
//! nested keys as `MS_LIMITS__MAX_LAYERS`) and programmatic overrides on top of those defaults via [`Loader`] before
//! deserializing into [`EngineConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/mapfile.default.toml");

/// Prefix shared by every environment override (`MS_MAPFILE`, `MS_MAPFILE_PATTERN`).
pub const ENV_PREFIX: &str = "MS";

/// Top-level configuration consumed by the engine and the `mapfile` binary.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Regular expression a document filename must match before it is opened.
    pub mapfile_pattern: String,
    /// Document used when the caller does not name one.
    #[serde(default)]
    pub mapfile: Option<String>,
    pub capabilities: CapabilitiesConfig,
    pub limits: LimitsConfig,
}

/// Optional grammar features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CapabilitiesConfig {
    pub truetype_fonts: bool,
    pub alpha_color: bool,
    pub legacy_style_shortcuts: bool,
}

/// Fixed capacities of the bounded collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LimitsConfig {
    pub max_layers: usize,
    pub max_classes: usize,
    pub max_styles: usize,
    pub max_joins: usize,
    pub max_symbols: usize,
    pub max_format_options: usize,
    pub max_projection_args: usize,
}

/// Separates nested keys in environment variable names. Top-level keys
/// already contain single underscores.
pub const ENV_SEPARATOR: &str = "__";

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

/// Helper for layering overrides over the built-in defaults.
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

    /// Layer `MS_*` variables from the process environment.
    pub fn with_environment(mut self) -> Self {
        self.builder = self
            .builder
            .add_source(environment());
        self
    }

    /// Layer `MS_*` variables from an explicit map instead of the process
    /// environment.
    pub fn with_environment_from(mut self, vars: HashMap<String, String>) -> Self {
        self.builder = self
            .builder
            .add_source(environment().source(Some(vars)));
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
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<EngineConfig, ConfigError> {
    Loader::new().build()
}
