//! Generator configuration, loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

fn default_output_dir() -> PathBuf {
    PathBuf::from("/tmp/ilk")
}
fn default_extension() -> String {
    ilkgen_emit::DEFAULT_EXTENSION.into()
}

// ---------------------------------------------------------------------------
// GeneratorConfig
// ---------------------------------------------------------------------------

/// Where and how generated solvers are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Directory receiving the generated files (default: `/tmp/ilk`).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Extension of solver files, without the dot (default: `ilk`).
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            extension: default_extension(),
        }
    }
}

impl GeneratorConfig {
    /// Load and validate a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on IO, parse or validation failure.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output_dir".into(),
                message: "must not be empty".into(),
            });
        }
        if self.extension.is_empty() || self.extension.contains(['.', '/']) {
            return Err(ConfigError::InvalidValue {
                field: "extension".into(),
                message: format!("'{}' is not a plain file extension", self.extension),
            });
        }
        Ok(())
    }

    /// Path of the file for the solver `name`.
    pub fn solver_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.{}", self.extension))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
