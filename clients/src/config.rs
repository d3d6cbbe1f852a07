//! `yaml2sdf` configuration file.
//!
//! ```toml
//! ontology = "ontology.json"
//!
//! [compile]
//! coref_mode = "both"
//! batch_policy = "skip-schema"
//! round_trip_check = true
//!
//! [validator]
//! enabled = true
//! endpoint = "http://localhost:8008/json-ld/ksf/validate"
//! timeout_secs = 10
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use std::path::{Path, PathBuf};

use kairos_sdf_compiler::CompileOptions;
use kairos_sdf_validation::RemoteValidatorConfig;
use serde::Deserialize;
use thiserror::Error;

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Ontology document path.
    pub ontology: Option<PathBuf>,
    /// Compiler options.
    pub compile: CompileOptions,
    /// Program validator settings.
    pub validator: RemoteValidatorConfig,
}

/// Errors reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not a valid configuration.
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
}

impl Config {
    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid TOML or has unknown keys.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parses configuration text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if `text` is malformed or has unknown keys.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
