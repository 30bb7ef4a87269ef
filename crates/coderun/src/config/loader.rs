//! Configuration file loading for coderun
//!
//! Handles loading and parsing configuration files using the config crate.

use std::path::Path;

use config::{Config as ConfigBuilder, File, FileFormat};

use crate::config::{Config, ConfigError};

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::ReadFile {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
            });
        }

        let config = ConfigBuilder::builder()
            .add_source(File::from(path))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config = ConfigBuilder::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, program) in self.toolchains.entries() {
            if program.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "toolchain '{name}' has empty program"
                )));
            }
        }

        if self.default_limits.timeout_seconds == Some(0) {
            return Err(ConfigError::Invalid(
                "default timeout must be at least one second".to_owned(),
            ));
        }

        if self.csharp_target_framework.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "csharp_target_framework is empty".to_owned(),
            ));
        }

        if let Some(ref root) = self.scratch_root
            && root.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid("scratch_root is empty".to_owned()));
        }

        Ok(())
    }
}
