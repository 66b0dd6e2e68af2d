//! Configuration for the validator CLI
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (typed.toml)
//! - Environment variables (TYPED__*)
//!
//! ## Example config file (typed.toml):
//! ```toml
//! [output]
//! format = "compact"
//!
//! [validation]
//! trim_undeclared = true
//!
//! [logging]
//! filter = "typed_descriptors=debug"
//! ```

use std::path::PathBuf;

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::descriptor::Type;
use crate::error::SchemaError;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypedConfig {
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON layout of printed values
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Validation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Drop undeclared fields of the root record instead of rejecting them
    #[serde(default)]
    pub trim_undeclared: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when RUST_LOG is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl OutputFormat {
    /// Render a JSON-serializable value
    pub fn render<T: Serialize>(self, value: &T) -> serde_json::Result<String> {
        match self {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            OutputFormat::Compact => serde_json::to_string(value),
        }
    }
}

/// Per-user config file under the platform config directory
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "typed-descriptors")
        .map(|dirs| dirs.config_dir().join("typed.toml"))
}

impl TypedConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a specific file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        for location in ["typed.toml", ".typed.toml", "config/typed.toml"] {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(user_config) = user_config_path().filter(|path| path.exists()) {
            builder = builder.add_source(File::from(user_config).required(false));
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // TYPED__OUTPUT__FORMAT=compact etc.
        builder = builder.add_source(
            Environment::with_prefix("TYPED")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Apply validation policy to a root schema
    pub fn apply(&self, schema: Type) -> Result<Type, SchemaError> {
        if self.validation.trim_undeclared && schema.record().is_some() {
            schema.trimmed()
        } else {
            Ok(schema)
        }
    }
}
